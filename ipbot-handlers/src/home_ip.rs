use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use ipbot_core::{CommandHandler, Result, TelegramApi};

use crate::ip::IpService;

const LOOKUP_FAILED: &str = "Could not determine the IP addresses right now. Please try again later.";

/// Answers `/home_ip` with the machine's local and public addresses.
pub struct HomeIpHandler {
    api: Arc<dyn TelegramApi>,
    ip: Arc<dyn IpService>,
}

impl HomeIpHandler {
    pub fn new(api: Arc<dyn TelegramApi>, ip: Arc<dyn IpService>) -> Self {
        Self { api, ip }
    }
}

#[async_trait]
impl CommandHandler for HomeIpHandler {
    async fn handle(&self, chat_id: i64) -> Result<()> {
        let info = match self.ip.ip_info().await {
            Ok(info) => info,
            Err(err) => {
                // Tell the user directly, then surface the error so the
                // pipeline still records the failure.
                self.api.send_message(chat_id, LOOKUP_FAILED).await?;
                return Err(err);
            }
        };

        info!(local = %info.local, public = %info.public, "ip lookup served");
        let text = format!(
            "Current IP addresses\n\nLocal IP: {}\nPublic IP: {}",
            info.local, info.public
        );
        self.api.send_message(chat_id, &text).await?;
        Ok(())
    }

    fn command(&self) -> &str {
        "/home_ip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::IpInfo;
    use ipbot_core::{BotError, Chat, Message, Update, User};
    use std::net::IpAddr;
    use std::sync::Mutex;

    struct FakeApi {
        sent: Mutex<Vec<(i64, String)>>,
    }

    impl FakeApi {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TelegramApi for FakeApi {
        async fn get_updates(&self, _offset: i64) -> Result<Vec<Update>> {
            Ok(Vec::new())
        }

        async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(Message {
                message_id: 1,
                from: None,
                chat: Chat {
                    id: chat_id,
                    kind: "private".to_string(),
                },
                text: Some(text.to_string()),
                date: 0,
            })
        }

        async fn delete_webhook(&self) -> Result<bool> {
            Ok(true)
        }

        async fn get_me(&self) -> Result<User> {
            Ok(User {
                id: 1,
                username: None,
                first_name: None,
            })
        }
    }

    struct FakeIpService {
        result: std::result::Result<IpInfo, String>,
    }

    #[async_trait]
    impl IpService for FakeIpService {
        fn local_ip(&self) -> Result<IpAddr> {
            match &self.result {
                Ok(info) => Ok(info.local),
                Err(msg) => Err(BotError::Handler(msg.clone())),
            }
        }

        async fn public_ip(&self) -> Result<IpAddr> {
            match &self.result {
                Ok(info) => Ok(info.public),
                Err(msg) => Err(BotError::Handler(msg.clone())),
            }
        }
    }

    #[tokio::test]
    async fn reports_both_addresses() {
        let api = FakeApi::new();
        let ip = Arc::new(FakeIpService {
            result: Ok(IpInfo {
                local: "192.168.1.5".parse().unwrap(),
                public: "203.0.113.9".parse().unwrap(),
            }),
        });

        HomeIpHandler::new(api.clone(), ip).handle(42).await.unwrap();

        let sent = api.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 42);
        assert!(sent[0].1.contains("Local IP: 192.168.1.5"));
        assert!(sent[0].1.contains("Public IP: 203.0.113.9"));
    }

    #[tokio::test]
    async fn lookup_failure_notifies_the_user_and_propagates() {
        let api = FakeApi::new();
        let ip = Arc::new(FakeIpService {
            result: Err("all services down".to_string()),
        });

        let err = HomeIpHandler::new(api.clone(), ip).handle(42).await.unwrap_err();

        assert!(matches!(err, BotError::Handler(_)));
        let sent = api.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("Could not determine"));
    }
}
