//! Response models as the client sees them.
//!
//! The server answers every call with a `success` envelope; [`ApiReply`]
//! accepts any of them and the typed accessors pick out the fields a given
//! endpoint promises.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Public projection of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Successful signup or login.
#[derive(Debug, Clone)]
pub struct AuthReply {
    pub message: String,
    pub token: String,
    pub user: SessionUser,
}

/// Successful `GET /credits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditsReply {
    pub credits: i64,
    pub name: String,
}

/// Successful image generation.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub message: String,
    pub credit_balance: i64,
    /// `data:image/png;base64,...`
    pub result_image: String,
}

/// Union of every envelope the API sends.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ApiReply {
    pub success: bool,
    pub message: String,
    pub details: Option<String>,
    pub token: Option<String>,
    pub user: Option<SessionUser>,
    pub credits: Option<i64>,
    pub name: Option<String>,
    pub credit_balance: Option<i64>,
    pub result_image: Option<String>,
}

impl ApiReply {
    /// Turn a `success: false` envelope into [`ClientError::Rejected`].
    pub fn accepted(self) -> Result<Self, ClientError> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::Rejected {
                message: self.message,
                details: self.details,
                credit_balance: self.credit_balance,
            })
        }
    }

    pub fn into_auth(self) -> Result<AuthReply, ClientError> {
        let reply = self.accepted()?;
        match (reply.token, reply.user) {
            (Some(token), Some(user)) => Ok(AuthReply {
                message: reply.message,
                token,
                user,
            }),
            _ => Err(missing("token or user")),
        }
    }

    pub fn into_credits(self) -> Result<CreditsReply, ClientError> {
        let reply = self.accepted()?;
        let credits = reply.credits.ok_or_else(|| missing("credits"))?;
        Ok(CreditsReply {
            credits,
            name: reply.name.unwrap_or_default(),
        })
    }

    pub fn into_image(self) -> Result<GeneratedImage, ClientError> {
        let reply = self.accepted()?;
        match (reply.credit_balance, reply.result_image) {
            (Some(credit_balance), Some(result_image)) => Ok(GeneratedImage {
                message: reply.message,
                credit_balance,
                result_image,
            }),
            _ => Err(missing("creditBalance or resultImage")),
        }
    }
}

fn missing(what: &str) -> ClientError {
    ClientError::UnexpectedResponse(format!("missing {what}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ApiReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn auth_reply_reads_id_field() {
        let reply = parse(
            r#"{"success":true,"message":"Login Successful","token":"t",
                "user":{"_id":"u1","name":"Ann","email":"a@x.com"}}"#,
        )
        .into_auth()
        .unwrap();

        assert_eq!(reply.token, "t");
        assert_eq!(reply.user.id, "u1");
    }

    #[test]
    fn failure_envelope_keeps_balance() {
        let err = parse(r#"{"success":false,"message":"You have no credits left.","creditBalance":0}"#)
            .into_image()
            .unwrap_err();

        match err {
            ClientError::Rejected {
                message,
                credit_balance,
                ..
            } => {
                assert_eq!(message, "You have no credits left.");
                assert_eq!(credit_balance, Some(0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn success_without_payload_is_unexpected() {
        let err = parse(r#"{"success":true}"#).into_credits().unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse(_)));
    }

    #[test]
    fn validation_details_reach_the_user_message() {
        let err = parse(
            r#"{"success":false,"message":"Fill the inputs properly","details":"Email is required"}"#,
        )
        .accepted()
        .unwrap_err();

        assert_eq!(err.user_message(), "Fill the inputs properly: Email is required");
    }
}
