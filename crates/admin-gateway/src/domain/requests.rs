//! Typed action requests.
//!
//! Field names are camelCase on both the REST and the JSON-RPC side, so a
//! bound request serializes directly into the remote method's params.

use super::actions::Action;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A request type bound to exactly one [`Action`].
pub trait ActionRequest: DeserializeOwned + Serialize + Send + Sync + 'static {
    const ACTION: Action;
}

/// Selector for the user listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserFilter {
    /// Show all users
    #[default]
    All,
    Active,
    Banned,
    Admins,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListUsersRequest {
    #[serde(default)]
    pub filter: UserFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanUserRequest {
    pub user_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbanUserRequest {
    pub user_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUserRoleRequest {
    pub user_id: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUploadBlockRequest {
    pub user_id: String,
    pub block: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub user_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListChannelsRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetChannelRequest {
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreezeChannelRequest {
    pub channel_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfreezeChannelRequest {
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChannelRequest {
    pub channel_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFilesRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    pub file_id: String,
}

macro_rules! bind_action {
    ($($request:ty => $action:ident),* $(,)?) => {
        $(impl ActionRequest for $request {
            const ACTION: Action = Action::$action;
        })*
    };
}

bind_action! {
    ListUsersRequest => ListUsers,
    BanUserRequest => BanUser,
    UnbanUserRequest => UnbanUser,
    ChangeUserRoleRequest => ChangeUserRole,
    SetUploadBlockRequest => SetUploadBlock,
    DeleteUserRequest => DeleteUser,
    ListChannelsRequest => ListChannels,
    GetChannelRequest => GetChannel,
    FreezeChannelRequest => FreezeChannel,
    UnfreezeChannelRequest => UnfreezeChannel,
    DeleteChannelRequest => DeleteChannel,
    ListFilesRequest => ListFiles,
    DeleteFileRequest => DeleteFile,
}

/// Wire params for a remote method: the request plus, for attributable
/// actions, the acting operator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCall<'a, R: ActionRequest> {
    #[serde(flatten)]
    pub request: &'a R,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<&'a str>,
}
