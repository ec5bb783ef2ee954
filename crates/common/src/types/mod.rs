use serde::Serialize;

/// Body of the public health endpoint.
///
/// `token` carries a short-lived diagnostic credential when the server is
/// configured to mint one.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
