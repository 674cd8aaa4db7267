//! REST-Client für den entfernten Plan-Speicher.
//!
//! Der Plan-Speicher verwaltet komplette Roadbook-Dokumente unter einem
//! `content`-Feld plus Metadaten (`name`, `description`, Zeitfenster als
//! `YYYYMMDD`, `labels`). Auth über Bearer-Token. Alle Aufrufe sind aus
//! Sicht des Modells fire-and-forget: ein Fehlschlag verdirbt nie den
//! lokalen Zustand, die lokale Persistenz bleibt die Wahrheit.

use crate::core::Roadbook;
use crate::json::{document_from_roadbook, DocumentKind, RoadbookDocument};
use chrono::{Days, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard-Labels neu angelegter Pläne.
const DEFAULT_PLAN_LABELS: [&str; 2] = ["路书", "旅行"];

/// Fehler der Plan-Speicher-Aufrufe.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transportfehler (DNS, Verbindung, Timeout, Body-Dekodierung)
    #[error("Netzwerkfehler: {0}")]
    Http(#[from] reqwest::Error),
    /// Server hat den Aufruf abgelehnt; `message` stammt aus der Antwort
    #[error("Server antwortete {status}: {message}")]
    Api { status: u16, message: String },
}

/// Plan-Metadaten für Listendarstellungen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Format YYYYMMDD
    #[serde(default)]
    pub start_time: String,
    /// Format YYYYMMDD
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Vollständiger Plan inklusive Roadbook-Inhalt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Das eigentliche Roadbook-Dokument
    pub content: RoadbookDocument,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanBody {
    name: String,
    description: String,
    start_time: String,
    end_time: String,
    labels: Vec<String>,
    content: RoadbookDocument,
}

#[derive(Debug, Deserialize)]
struct ListPlansResponse {
    #[serde(default)]
    plans: Vec<PlanSummary>,
}

#[derive(Debug, Deserialize)]
struct GetPlanResponse {
    plan: Plan,
}

/// Antwort auf Anlegen/Speichern eines Plans.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCreated {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Blocking-Client für die Plan-Endpunkte.
pub struct PlanStoreClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::blocking::Client,
}

impl PlanStoreClient {
    /// Erstellt einen Client ohne Token (nur `login` und `shared_plan`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Übernimmt ein bereits bekanntes Token (z.B. aus der Options-Datei).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// `true` sobald ein Token vorliegt.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Meldet den Benutzer an und merkt sich das Bearer-Token.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), RemoteError> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(&LoginRequest { username, password })
            .send()?;
        let response = Self::check(response)?;
        let body: LoginResponse = response.json()?;
        self.token = Some(body.token);
        log::info!("Am Plan-Speicher angemeldet");
        Ok(())
    }

    /// Listet alle Pläne des Benutzers.
    pub fn list_plans(&self) -> Result<Vec<PlanSummary>, RemoteError> {
        let response = self.send(self.http.get(self.url("/plans")))?;
        let body: ListPlansResponse = response.json()?;
        Ok(body.plans)
    }

    /// Lädt einen Plan inklusive Roadbook-Inhalt.
    pub fn get_plan(&self, id: &str) -> Result<Plan, RemoteError> {
        let response = self.send(self.http.get(self.url(&format!("/plans/{id}"))))?;
        let body: GetPlanResponse = response.json()?;
        Ok(body.plan)
    }

    /// Legt einen neuen Plan mit dem aktuellen Roadbook-Inhalt an.
    /// Zeitfenster: heute bis heute + 7 Tage.
    pub fn create_plan(&self, name: &str, book: &Roadbook) -> Result<PlanCreated, RemoteError> {
        let response = self.send(
            self.http
                .post(self.url("/plans"))
                .json(&Self::plan_body(name, book)),
        )?;
        let created: PlanCreated = response.json()?;
        log::info!("Plan angelegt: {} ({})", created.name, created.id);
        Ok(created)
    }

    /// Überschreibt einen bestehenden Plan mit dem aktuellen Inhalt.
    pub fn save_plan(&self, id: &str, name: &str, book: &Roadbook) -> Result<(), RemoteError> {
        let response = self.send(
            self.http
                .put(self.url(&format!("/plans/{id}")))
                .json(&Self::plan_body(name, book)),
        )?;
        // Antwort-Body (id/name) wird nicht weiter benötigt
        drop(response);
        log::info!("Plan gespeichert: {name} ({id})");
        Ok(())
    }

    /// Löscht einen Plan.
    pub fn delete_plan(&self, id: &str) -> Result<(), RemoteError> {
        self.send(self.http.delete(self.url(&format!("/plans/{id}"))))?;
        log::info!("Plan gelöscht: {id}");
        Ok(())
    }

    /// Lädt einen geteilten Plan ohne Anmeldung (Share-Link-Ziel).
    pub fn shared_plan(&self, id: &str) -> Result<Plan, RemoteError> {
        let response = self.send(self.http.get(self.url(&format!("/plans/{id}/share"))))?;
        let body: GetPlanResponse = response.json()?;
        Ok(body.plan)
    }

    /// Öffentlicher Share-Link eines Plans.
    pub fn share_url(&self, id: &str) -> String {
        self.url(&format!("/plans/{id}/share"))
    }

    fn plan_body(name: &str, book: &Roadbook) -> PlanBody {
        let (start_time, end_time) = default_plan_window();
        PlanBody {
            name: name.to_string(),
            description: format!("路书计划 - {}", Local::now().format("%Y/%m/%d")),
            start_time,
            end_time,
            labels: DEFAULT_PLAN_LABELS.iter().map(|s| s.to_string()).collect(),
            content: document_from_roadbook(book, DocumentKind::PortableExport),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(
        &self,
        builder: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        Self::check(builder.send()?)
    }

    fn check(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ApiErrorBody>()
            .map(|body| body.message)
            .unwrap_or_default();
        let message = if message.is_empty() {
            format!("请求失败: {status}")
        } else {
            message
        };
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Standard-Zeitfenster neuer Pläne: heute bis heute + 7 Tage (YYYYMMDD).
pub fn default_plan_window() -> (String, String) {
    let today = Local::now().date_naive();
    let end = today.checked_add_days(Days::new(7)).unwrap_or(today);
    (
        today.format("%Y%m%d").to_string(),
        end.format("%Y%m%d").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_window_format() {
        let (start, end) = default_plan_window();
        assert_eq!(start.len(), 8);
        assert_eq!(end.len(), 8);
        assert!(start.chars().all(|c| c.is_ascii_digit()));
        assert!(end > start);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = PlanStoreClient::new("https://api.example.com/api/");
        assert_eq!(
            client.share_url("abc"),
            "https://api.example.com/api/plans/abc/share"
        );
    }

    #[test]
    fn test_plan_deserializes_with_content() {
        let json = r#"{
            "id": "p1", "name": "五一出游", "description": "",
            "startTime": "20240501", "endTime": "20240508",
            "labels": ["路书", "旅行"], "createdAt": "2024-04-30T12:00:00Z",
            "content": {"version": "2.0", "markers": [], "connections": []}
        }"#;
        let plan: Plan = serde_json::from_str(json).expect("dekodierbar");
        assert_eq!(plan.id, "p1");
        assert_eq!(plan.content.version.as_deref(), Some("2.0"));
    }
}
