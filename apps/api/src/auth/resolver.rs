//! Auth Status Resolver: decides whether Gmail is usable and, if not, where the
//! user should go to grant access.
//!
//! The agent is asked to reply `AUTH_OK` when credentials are valid. Otherwise the
//! consent link is scraped, in order, from: the run's final output, the serialized
//! run, and the auth hook channel. Planning errors are searched the same way.
//! Resolution never fails; missing information degrades to `auth_url: None`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::agent::hooks::AuthHooks;
use crate::agent::prompts::{AUTH_CHECK_QUERY, AUTH_OK_MARKER, GMAIL_SEND_TOOL};
use crate::agent::{Agent, AgentError, AgentRun};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub auth_url: Option<String>,
    pub raw: Option<String>,
}

fn re_google_auth_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)https?://accounts\.google\.com[^\s"'>]+"#)
            .expect("auth URL pattern is valid")
    })
}

/// First Google account link in `text`, if any.
pub fn find_auth_url(text: &str) -> Option<String> {
    re_google_auth_url()
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// Runs the auth-check query restricted to the Gmail tool and resolves the outcome.
pub async fn check_auth(agent: &dyn Agent, hooks: &AuthHooks) -> AuthStatus {
    let outcome = agent.run(AUTH_CHECK_QUERY, &[GMAIL_SEND_TOOL]).await;
    let status = resolve_auth_status(outcome, hooks);
    info!(
        "Gmail auth check: authenticated={}, auth_url_found={}",
        status.authenticated,
        status.auth_url.is_some()
    );
    status
}

pub fn resolve_auth_status(outcome: Result<AgentRun, AgentError>, hooks: &AuthHooks) -> AuthStatus {
    match outcome {
        Ok(run) => {
            let text = run.final_output_text().unwrap_or_default();
            if text.contains(AUTH_OK_MARKER) {
                return AuthStatus {
                    authenticated: true,
                    auth_url: None,
                    raw: Some(text),
                };
            }

            let auth_url = find_auth_url(&text)
                .or_else(|| run.dump_json().as_deref().and_then(find_auth_url))
                .or_else(|| hooks.last_auth_url());

            AuthStatus {
                authenticated: false,
                auth_url,
                raw: Some(text),
            }
        }
        Err(AgentError::Plan(text)) => {
            warn!("Auth check could not be planned: {text}");
            AuthStatus {
                authenticated: false,
                auth_url: find_auth_url(&text).or_else(|| hooks.last_auth_url()),
                raw: Some(text),
            }
        }
        Err(e) => {
            warn!("Auth check failed: {e}");
            AuthStatus {
                authenticated: false,
                auth_url: hooks.last_auth_url(),
                raw: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api_error, output_run, ScriptedAgent};
    use serde_json::json;

    const CONSENT: &str = "https://accounts.google.com/o/oauth2/auth?foo=bar";

    fn hooks_with(url: Option<&str>) -> AuthHooks {
        let hooks = AuthHooks::new();
        if let Some(url) = url {
            hooks.on_auth_url(url);
        }
        hooks
    }

    #[test]
    fn test_auth_ok_marker() {
        let status = resolve_auth_status(Ok(output_run(json!("AUTH_OK"))), &hooks_with(None));
        assert_eq!(
            status,
            AuthStatus {
                authenticated: true,
                auth_url: None,
                raw: Some("AUTH_OK".to_string()),
            }
        );
    }

    #[test]
    fn test_auth_ok_wins_over_hook_url() {
        let status = resolve_auth_status(
            Ok(output_run(json!("Gmail ready: AUTH_OK"))),
            &hooks_with(Some("https://accounts.google.com/stale")),
        );
        assert!(status.authenticated);
        assert!(status.auth_url.is_none());
    }

    #[test]
    fn test_url_from_output_text() {
        let status = resolve_auth_status(
            Ok(output_run(json!(format!("Please visit {CONSENT} to continue")))),
            &hooks_with(Some("https://accounts.google.com/from-hook")),
        );
        assert!(!status.authenticated);
        assert_eq!(status.auth_url.as_deref(), Some(CONSENT));
    }

    #[test]
    fn test_url_stops_at_quotes_and_angle_brackets() {
        assert_eq!(
            find_auth_url(r#"<a href="https://accounts.google.com/o/auth?x=1">link</a>"#).as_deref(),
            Some("https://accounts.google.com/o/auth?x=1")
        );
        assert_eq!(
            find_auth_url("<https://accounts.google.com/x'>").as_deref(),
            Some("https://accounts.google.com/x")
        );
    }

    #[test]
    fn test_pattern_is_case_insensitive_and_accepts_http() {
        assert_eq!(
            find_auth_url("go to HTTP://Accounts.Google.com/signin now").as_deref(),
            Some("HTTP://Accounts.Google.com/signin")
        );
    }

    #[test]
    fn test_other_hosts_do_not_match() {
        assert!(find_auth_url("https://mail.google.com/mail").is_none());
        assert!(find_auth_url("https://accounts.google.com").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let text = "a https://accounts.google.com/one b https://accounts.google.com/two";
        assert_eq!(
            find_auth_url(text).as_deref(),
            Some("https://accounts.google.com/one")
        );
    }

    #[test]
    fn test_falls_back_to_serialized_run() {
        let run: AgentRun = serde_json::from_value(json!({
            "state": "NEED_CLARIFICATION",
            "outputs": {
                "final_output": {"value": "Authentication is required."},
                "clarifications": [{"category": "Action", "action_url": CONSENT}]
            }
        }))
        .unwrap();

        let status = resolve_auth_status(
            Ok(run),
            &hooks_with(Some("https://accounts.google.com/from-hook")),
        );
        assert_eq!(status.auth_url.as_deref(), Some(CONSENT));
        assert_eq!(status.raw.as_deref(), Some("Authentication is required."));
    }

    #[test]
    fn test_falls_back_to_hook_url() {
        let status = resolve_auth_status(
            Ok(output_run(json!("I could not check."))),
            &hooks_with(Some("https://accounts.google.com/from-hook")),
        );
        assert_eq!(
            status.auth_url.as_deref(),
            Some("https://accounts.google.com/from-hook")
        );
    }

    #[test]
    fn test_nothing_found_is_not_an_error() {
        let status = resolve_auth_status(Ok(AgentRun::default()), &hooks_with(None));
        assert_eq!(
            status,
            AuthStatus {
                authenticated: false,
                auth_url: None,
                raw: Some(String::new()),
            }
        );
    }

    #[test]
    fn test_plan_error_text_is_searched_first() {
        let status = resolve_auth_status(
            Err(AgentError::Plan(format!("Auth needed: {CONSENT}"))),
            &hooks_with(Some("https://accounts.google.com/from-hook")),
        );
        assert_eq!(status.auth_url.as_deref(), Some(CONSENT));
        assert_eq!(status.raw.as_deref(), Some(&*format!("Auth needed: {CONSENT}")));
    }

    #[test]
    fn test_plan_error_without_url_uses_hook() {
        let status = resolve_auth_status(
            Err(AgentError::Plan("no plan".to_string())),
            &hooks_with(Some("https://accounts.google.com/from-hook")),
        );
        assert_eq!(
            status.auth_url.as_deref(),
            Some("https://accounts.google.com/from-hook")
        );
    }

    #[test]
    fn test_other_errors_use_hook_only() {
        let status = resolve_auth_status(
            Err(api_error(&format!("upstream mentioned {CONSENT}"))),
            &hooks_with(None),
        );
        assert!(!status.authenticated);
        assert!(status.auth_url.is_none());
        assert!(status.raw.unwrap().contains("upstream mentioned"));
    }

    #[tokio::test]
    async fn test_check_auth_restricts_to_gmail_tool() {
        let agent = ScriptedAgent::new(vec![Ok(output_run(json!("AUTH_OK")))]);
        let status = check_auth(&agent, &AuthHooks::new()).await;

        assert!(status.authenticated);
        let calls = agent.calls();
        assert_eq!(calls[0].tools, vec![GMAIL_SEND_TOOL.to_string()]);
        assert!(calls[0].query.contains("AUTH_OK"));
    }
}
