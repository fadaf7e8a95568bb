//! Action catalogue: one descriptor row per administrative action.
//!
//! The dispatcher is generic; everything that differs between actions
//! (remote method, identity requirement, confirmation message) lives here.

/// Administrative action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListUsers,
    BanUser,
    UnbanUser,
    ChangeUserRole,
    SetUploadBlock,
    DeleteUser,
    ListChannels,
    GetChannel,
    FreezeChannel,
    UnfreezeChannel,
    DeleteChannel,
    ListFiles,
    DeleteFile,
}

/// Action category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    User,
    Channel,
    File,
}

/// Descriptor row for one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub action: Action,
    /// Short name used in logs and metrics (e.g., "banUser")
    pub name: &'static str,
    pub category: ActionCategory,
    /// JSON-RPC method on the backend
    pub remote_method: &'static str,
    /// Field a `:id` path segment binds onto
    pub id_field: Option<&'static str>,
    /// Backend contract marks the action as attributable to an operator
    pub requires_identity: bool,
    /// Mutates backend state
    pub is_write: bool,
    /// Confirmation message placed in a successful envelope
    pub success_message: &'static str,
}

impl ActionDescriptor {
    /// Create a read-only action.
    const fn read(
        action: Action,
        name: &'static str,
        category: ActionCategory,
        remote_method: &'static str,
        success_message: &'static str,
    ) -> Self {
        Self {
            action,
            name,
            category,
            remote_method,
            id_field: None,
            requires_identity: false,
            is_write: false,
            success_message,
        }
    }

    /// Create a mutating action.
    const fn write(
        action: Action,
        name: &'static str,
        category: ActionCategory,
        remote_method: &'static str,
        success_message: &'static str,
    ) -> Self {
        Self {
            is_write: true,
            ..Self::read(action, name, category, remote_method, success_message)
        }
    }

    /// Mark the action as requiring a caller identity.
    const fn attributable(self) -> Self {
        Self {
            requires_identity: true,
            ..self
        }
    }

    /// Bind a `:id` path segment onto `field`.
    const fn addressed_by(self, field: &'static str) -> Self {
        Self {
            id_field: Some(field),
            ..self
        }
    }
}

/// Descriptor table, indexed by `Action as usize`.
pub static ACTION_TABLE: [ActionDescriptor; 13] = [
    // ═══════════════════════════════════════════════════════════════════════
    // USERS
    // ═══════════════════════════════════════════════════════════════════════
    ActionDescriptor::read(
        Action::ListUsers,
        "listUsers",
        ActionCategory::User,
        "admin.listUsers",
        "users fetched",
    ),
    ActionDescriptor::write(
        Action::BanUser,
        "banUser",
        ActionCategory::User,
        "admin.banUser",
        "user banned",
    ),
    ActionDescriptor::write(
        Action::UnbanUser,
        "unbanUser",
        ActionCategory::User,
        "admin.unbanUser",
        "user unbanned",
    ),
    ActionDescriptor::write(
        Action::ChangeUserRole,
        "changeUserRole",
        ActionCategory::User,
        "admin.changeUserRole",
        "user role updated",
    ),
    ActionDescriptor::write(
        Action::SetUploadBlock,
        "setUploadBlock",
        ActionCategory::User,
        "admin.setUploadBlock",
        "upload permission updated",
    )
    .attributable(),
    ActionDescriptor::write(
        Action::DeleteUser,
        "deleteUser",
        ActionCategory::User,
        "admin.deleteUser",
        "user deleted",
    )
    .attributable(),
    // ═══════════════════════════════════════════════════════════════════════
    // CHANNELS
    // ═══════════════════════════════════════════════════════════════════════
    ActionDescriptor::read(
        Action::ListChannels,
        "listChannels",
        ActionCategory::Channel,
        "admin.listChannels",
        "channels fetched",
    ),
    ActionDescriptor::read(
        Action::GetChannel,
        "getChannel",
        ActionCategory::Channel,
        "admin.getChannel",
        "channel fetched",
    )
    .addressed_by("channelId"),
    ActionDescriptor::write(
        Action::FreezeChannel,
        "freezeChannel",
        ActionCategory::Channel,
        "admin.freezeChannel",
        "channel frozen",
    ),
    ActionDescriptor::write(
        Action::UnfreezeChannel,
        "unfreezeChannel",
        ActionCategory::Channel,
        "admin.unfreezeChannel",
        "channel unfrozen",
    ),
    ActionDescriptor::write(
        Action::DeleteChannel,
        "deleteChannel",
        ActionCategory::Channel,
        "admin.deleteChannel",
        "channel deleted",
    )
    .attributable(),
    // ═══════════════════════════════════════════════════════════════════════
    // FILES
    // ═══════════════════════════════════════════════════════════════════════
    ActionDescriptor::read(
        Action::ListFiles,
        "listFiles",
        ActionCategory::File,
        "admin.listFiles",
        "files fetched",
    ),
    ActionDescriptor::write(
        Action::DeleteFile,
        "deleteFile",
        ActionCategory::File,
        "admin.deleteFile",
        "file deleted",
    )
    .attributable()
    .addressed_by("fileId"),
];

impl Action {
    /// All actions, in table order.
    pub const ALL: [Action; 13] = [
        Action::ListUsers,
        Action::BanUser,
        Action::UnbanUser,
        Action::ChangeUserRole,
        Action::SetUploadBlock,
        Action::DeleteUser,
        Action::ListChannels,
        Action::GetChannel,
        Action::FreezeChannel,
        Action::UnfreezeChannel,
        Action::DeleteChannel,
        Action::ListFiles,
        Action::DeleteFile,
    ];

    /// Descriptor row for this action.
    pub fn descriptor(self) -> &'static ActionDescriptor {
        &ACTION_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}
