use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;

const MODEL: &str = "gemini-2.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub const OFFLINE_REPLY: &str = "Desculpe, estou offline no momento (Falta API Key).";
pub const BLANK_REPLY: &str = "Estou com dificuldade para pensar agora.";
pub const TROUBLE_REPLY: &str = "Desculpe, estou com problemas de conexão.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("assistant upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("assistant returned an empty reply")]
    EmptyReply,
    #[error("assistant has no API key configured")]
    Offline,
}

/// The fixed pt-BR line the widget shows for a given failure.
pub fn fallback(err: &AssistantError) -> &'static str {
    match err {
        AssistantError::Offline => OFFLINE_REPLY,
        AssistantError::EmptyReply => BLANK_REPLY,
        _ => TROUBLE_REPLY,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One prior exchange, as the widget stores it client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Virtual receptionist backed by the Gemini REST API. The whole shop
/// context travels as the system instruction on every call; nothing is
/// kept server-side between turns.
#[derive(Debug, Clone)]
pub struct Assistant {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    system_instruction: String,
}

impl Assistant {
    pub fn new(catalog: &Catalog, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        Self::with_base_url(catalog, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        catalog: &Catalog,
        api_key: Option<String>,
        base_url: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            system_instruction: system_instruction(catalog),
        })
    }

    pub async fn reply(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, AssistantError> {
        let key = self.api_key.as_deref().ok_or(AssistantError::Offline)?;

        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content {
                role: turn.role.as_str(),
                parts: vec![Part {
                    text: turn.text.clone(),
                }],
            })
            .collect();
        contents.push(Content {
            role: ChatRole::User.as_str(),
            parts: vec![Part {
                text: message.to_string(),
            }],
        });

        let url = format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&GenerateRequest {
                contents,
                system_instruction: SystemInstruction {
                    parts: vec![Part {
                        text: self.system_instruction.clone(),
                    }],
                },
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AssistantError::Status(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AssistantError::EmptyReply);
        }
        Ok(text)
    }
}

/// Receptionist briefing built from the live catalog, so the bot quotes
/// real prices and policies.
fn system_instruction(catalog: &Catalog) -> String {
    let services = catalog
        .services
        .iter()
        .map(|s| {
            format!(
                "- {} ({} min, R$ {}): {}",
                s.name, s.duration_min, s.price, s.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let professionals = catalog
        .professionals
        .iter()
        .map(|p| format!("- {} ({})", p.name, p.role))
        .collect::<Vec<_>>()
        .join("\n");

    let policies = if catalog.policies.is_empty() {
        "Regras padrão aplicadas.".to_string()
    } else {
        catalog.policies.join("\n- ")
    };

    let loyalty = if catalog.loyalty.enabled {
        format!(
            "PROGRAMA DE FIDELIDADE: Oferecemos {} a cada {} visitas.",
            catalog.loyalty.reward_description, catalog.loyalty.threshold
        )
    } else {
        "Sem programa de fidelidade ativo no momento.".to_string()
    };

    format!(
        "Você é o Recepcionista Virtual da {name}.\n\
         Seu objetivo é ajudar clientes a escolher serviços, entender as regras e tirar dúvidas.\n\
         \n\
         Informações do Negócio:\n\
         - Nome: {name}\n\
         - Localização: {location}\n\
         - Avaliação: {rating}/5 estrelas\n\
         \n\
         Profissionais:\n\
         {professionals}\n\
         \n\
         Serviços Disponíveis:\n\
         {services}\n\
         \n\
         Regras:\n\
         - {policies}\n\
         \n\
         {loyalty}\n\
         \n\
         Diretrizes:\n\
         - Seja breve, amigável e prestativo (fale em Português).\n\
         - Se perguntarem sobre profissionais, liste quem trabalha aqui.\n\
         - Recomende serviços com base no que o cliente quer.\n\
         - Não invente horários; diga apenas que você pode verificar a agenda.\n\
         - Use emojis ocasionalmente.\n\
         - Se perguntarem como agendar, encoraje-os a selecionar os serviços e clicar em \"Continuar\".",
        name = catalog.provider.name,
        location = catalog.provider.location,
        rating = catalog.provider.rating,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog() -> Catalog {
        Catalog::zero_um()
    }

    #[test]
    fn test_briefing_quotes_the_catalog() {
        let prompt = system_instruction(&catalog());
        assert!(prompt.starts_with("Você é o Recepcionista Virtual da Zero Um Barber Shop."));
        assert!(prompt.contains("- Iwlys (Barbeiro)"));
        assert!(prompt.contains("- Corte (30 min, R$ 35): Corte social ou moderno."));
        assert!(prompt.contains("- Cancelamento com 24h de antecedência."));
        assert!(prompt.contains("PROGRAMA DE FIDELIDADE: Oferecemos Corte Grátis a cada 10 visitas."));
        assert!(prompt.ends_with("clicar em \"Continuar\"."));
    }

    #[test]
    fn test_fallback_strings_per_failure() {
        assert_eq!(fallback(&AssistantError::Offline), OFFLINE_REPLY);
        assert_eq!(fallback(&AssistantError::EmptyReply), BLANK_REPLY);
        assert_eq!(
            fallback(&AssistantError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)),
            TROUBLE_REPLY
        );
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        // No mock server: the endpoint must never be contacted.
        let assistant =
            Assistant::with_base_url(&catalog(), None, "http://127.0.0.1:9").unwrap();
        let err = assistant.reply("Oi", &[]).await.unwrap_err();
        assert!(matches!(err, AssistantError::Offline));

        let assistant =
            Assistant::with_base_url(&catalog(), Some("  ".to_string()), "http://127.0.0.1:9")
                .unwrap();
        let err = assistant.reply("Oi", &[]).await.unwrap_err();
        assert!(matches!(err, AssistantError::Offline));
    }

    #[tokio::test]
    async fn test_reply_sends_history_and_reads_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "Oi" }] },
                    { "role": "model", "parts": [{ "text": "Olá!" }] },
                    { "role": "user", "parts": [{ "text": "Tem corte hoje?" }] }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "Posso verificar a agenda! 😉" }] } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let assistant =
            Assistant::with_base_url(&catalog(), Some("test-key".to_string()), &server.uri())
                .unwrap();
        let history = vec![
            ChatTurn {
                role: ChatRole::User,
                text: "Oi".to_string(),
            },
            ChatTurn {
                role: ChatRole::Model,
                text: "Olá!".to_string(),
            },
        ];
        let reply = assistant.reply("Tem corte hoje?", &history).await.unwrap();
        assert_eq!(reply, "Posso verificar a agenda! 😉");
    }

    #[tokio::test]
    async fn test_blank_candidate_is_an_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .mount(&server)
            .await;

        let assistant =
            Assistant::with_base_url(&catalog(), Some("test-key".to_string()), &server.uri())
                .unwrap();
        let err = assistant.reply("Oi", &[]).await.unwrap_err();
        assert!(matches!(err, AssistantError::EmptyReply));
    }

    #[tokio::test]
    async fn test_upstream_error_is_reported_as_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let assistant =
            Assistant::with_base_url(&catalog(), Some("test-key".to_string()), &server.uri())
                .unwrap();
        let err = assistant.reply("Oi", &[]).await.unwrap_err();
        assert!(matches!(err, AssistantError::Status(status) if status.as_u16() == 500));
    }
}
