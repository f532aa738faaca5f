//! Social action types for the SEDDIT transaction engine
//!
//! This module defines the action types that can be turned into fee-bearing
//! transactions, together with their action-specific payloads.

use crate::types::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum allowed length for post content, in characters.
pub const MAX_POST_LENGTH: usize = 280;

/// Action types supported by the transaction engine
///
/// Each variant represents a wallet-gated social action with a fixed fee
/// looked up from the fee policy at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    /// Publish a new post to the feed
    Post,

    /// Like an existing post
    Like,

    /// Retweet an existing post
    Retweet,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Post => write!(f, "POST"),
            ActionType::Like => write!(f, "LIKE"),
            ActionType::Retweet => write!(f, "RETWEET"),
        }
    }
}

impl FromStr for ActionType {
    type Err = EngineError;

    /// Parse an action type name, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownActionType` for any unrecognized name.
    /// This is the only place the unknown-type failure can arise; once a
    /// value is an `ActionType`, fee lookup is total.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "POST" => Ok(ActionType::Post),
            "LIKE" => Ok(ActionType::Like),
            "RETWEET" => Ok(ActionType::Retweet),
            _ => Err(EngineError::unknown_action_type(s)),
        }
    }
}

/// Action-specific payload data
///
/// Carries the content of a post, or the target-post reference for likes
/// and retweets. The payload determines the action type; the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionPayload {
    /// Content for a new post
    Post {
        /// The post text (non-empty, at most [`MAX_POST_LENGTH`] characters)
        content: String,
    },

    /// Reference to the post being liked
    Like {
        /// Identifier of the target post
        target_post: String,
    },

    /// Reference to the post being retweeted
    Retweet {
        /// Identifier of the target post
        target_post: String,
    },
}

impl ActionPayload {
    /// The action type this payload belongs to
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionPayload::Post { .. } => ActionType::Post,
            ActionPayload::Like { .. } => ActionType::Like,
            ActionPayload::Retweet { .. } => ActionType::Retweet,
        }
    }

    /// Validate action-specific preconditions
    ///
    /// Posts require non-empty trimmed content within the length bound.
    /// Likes and retweets require a non-empty target-post reference.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ValidationError` with a human-readable reason.
    pub fn validate(&self) -> Result<(), EngineError> {
        match self {
            ActionPayload::Post { content } => {
                if content.trim().is_empty() {
                    return Err(EngineError::validation("post content cannot be empty"));
                }
                if content.chars().count() > MAX_POST_LENGTH {
                    return Err(EngineError::validation(format!(
                        "post content exceeds {} characters",
                        MAX_POST_LENGTH
                    )));
                }
                Ok(())
            }
            ActionPayload::Like { target_post } | ActionPayload::Retweet { target_post } => {
                if target_post.trim().is_empty() {
                    return Err(EngineError::validation("target post id is required"));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::post("POST", ActionType::Post)]
    #[case::like("LIKE", ActionType::Like)]
    #[case::retweet("RETWEET", ActionType::Retweet)]
    #[case::lowercase("post", ActionType::Post)]
    #[case::mixed_case("ReTweet", ActionType::Retweet)]
    fn test_action_type_parsing(#[case] input: &str, #[case] expected: ActionType) {
        assert_eq!(input.parse::<ActionType>().unwrap(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::typo("PSOT")]
    #[case::unrelated("DEPOSIT")]
    fn test_unknown_action_type(#[case] input: &str) {
        let err = input.parse::<ActionType>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownActionType { .. }));
    }

    #[test]
    fn test_action_type_display_round_trip() {
        for action in [ActionType::Post, ActionType::Like, ActionType::Retweet] {
            assert_eq!(action.to_string().parse::<ActionType>().unwrap(), action);
        }
    }

    #[rstest]
    #[case::post(ActionPayload::Post { content: "hi".into() }, ActionType::Post)]
    #[case::like(ActionPayload::Like { target_post: "42".into() }, ActionType::Like)]
    #[case::retweet(ActionPayload::Retweet { target_post: "42".into() }, ActionType::Retweet)]
    fn test_payload_action_type(#[case] payload: ActionPayload, #[case] expected: ActionType) {
        assert_eq!(payload.action_type(), expected);
    }

    #[test]
    fn test_valid_post_payload() {
        let payload = ActionPayload::Post {
            content: "hello SEDDIT".into(),
        };
        assert!(payload.validate().is_ok());
    }

    #[rstest]
    #[case::empty_content(ActionPayload::Post { content: String::new() })]
    #[case::whitespace_content(ActionPayload::Post { content: "   ".into() })]
    #[case::too_long(ActionPayload::Post { content: "x".repeat(MAX_POST_LENGTH + 1) })]
    #[case::empty_like_target(ActionPayload::Like { target_post: String::new() })]
    #[case::empty_retweet_target(ActionPayload::Retweet { target_post: " ".into() })]
    fn test_invalid_payloads(#[case] payload: ActionPayload) {
        let err = payload.validate().unwrap_err();
        assert!(matches!(err, EngineError::ValidationError { .. }));
    }

    #[test]
    fn test_post_at_length_limit_is_valid() {
        let payload = ActionPayload::Post {
            content: "x".repeat(MAX_POST_LENGTH),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_payload_json_round_trip() {
        let payload = ActionPayload::Like {
            target_post: "post-7".into(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        let back: ActionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
