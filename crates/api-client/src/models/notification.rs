use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Delivery channel kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Discord,
    Telegram,
    Email,
}

impl NotificationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Telegram => "telegram",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discord" => Ok(Self::Discord),
            "telegram" => Ok(Self::Telegram),
            "email" => Ok(Self::Email),
            other => Err(format!("unsupported notification type {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct DiscordConfig {
    pub webhook_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Channel settings, discriminated by `type` like monitor configs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationConfig {
    Discord(DiscordConfig),
    Telegram(TelegramConfig),
    /// Email settings are passed through untyped
    Email(Value),
}

impl NotificationConfig {
    #[must_use]
    pub fn kind(&self) -> NotificationType {
        match self {
            Self::Discord(_) => NotificationType::Discord,
            Self::Telegram(_) => NotificationType::Telegram,
            Self::Email(_) => NotificationType::Email,
        }
    }

    /// Build the variant named by `kind` from a config payload
    pub fn from_parts(kind: NotificationType, config: Value) -> Result<Self, serde_json::Error> {
        let config = match config {
            Value::String(raw) => serde_json::from_str(&raw)?,
            other => other,
        };

        Ok(match kind {
            NotificationType::Discord => Self::Discord(serde_json::from_value(config)?),
            NotificationType::Telegram => Self::Telegram(serde_json::from_value(config)?),
            NotificationType::Email => Self::Email(config),
        })
    }
}

impl Serialize for NotificationConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NotificationConfig", 2)?;
        state.serialize_field("type", &self.kind())?;
        match self {
            Self::Discord(config) => state.serialize_field("config", config)?,
            Self::Telegram(config) => state.serialize_field("config", config)?,
            Self::Email(config) => state.serialize_field("config", config)?,
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for NotificationConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Tagged {
            #[serde(rename = "type")]
            kind: NotificationType,
            #[serde(default)]
            config: Value,
        }

        let Tagged { kind, config } = Tagged::deserialize(deserializer)?;
        Self::from_parts(kind, config).map_err(D::Error::custom)
    }
}

/// A team's notification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub team_id: String,
    pub name: String,
    #[serde(flatten)]
    pub config: NotificationConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `POST teams/:team/notifications` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationCreateRequest {
    pub name: String,
    #[serde(flatten)]
    pub config: NotificationConfig,
}

/// `PATCH teams/:team/notifications/:id` body; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub config: Option<NotificationConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_telegram_channel_from_normalized_payload() {
        let notification: Notification = serde_json::from_value(json!({
            "id": "9",
            "teamId": "7",
            "name": "On-call",
            "type": "telegram",
            "config": {"botToken": "123:abc", "chatId": "-100"},
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(notification.config.kind(), NotificationType::Telegram);
        assert_eq!(
            notification.config,
            NotificationConfig::Telegram(TelegramConfig {
                bot_token: "123:abc".to_string(),
                chat_id: "-100".to_string(),
            })
        );
    }

    #[test]
    fn test_requests_serialize_snake_case() {
        let create = NotificationCreateRequest {
            name: "Alerts".to_string(),
            config: NotificationConfig::Discord(DiscordConfig {
                webhook_url: "https://discord.test/hook".to_string(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            json!({
                "name": "Alerts",
                "type": "discord",
                "config": {"webhook_url": "https://discord.test/hook"}
            })
        );

        let rename = NotificationUpdateRequest {
            name: Some("Renamed".to_string()),
            config: None,
        };
        assert_eq!(serde_json::to_value(&rename).unwrap(), json!({"name": "Renamed"}));
    }
}
