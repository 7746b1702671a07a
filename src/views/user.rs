use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageReply {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
    pub message: String,
    pub first_name: String,
    pub last_name: String,
    pub user_id: String,
}
