//! Access decisions: who may see which page.
//!
//! Session lookup itself lives with the identity-provider client; this module
//! only decides what to do with the identity it returns.

use std::fmt;
use std::str::FromStr;

/// Path prefixes that require a signed-in, allowed user.
pub const PROTECTED_PREFIXES: [&str; 2] = ["/dashboard", "/analysis"];

pub const ENTRY_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque user id, forwarded to the analysis backend as `X-User-Id`.
    pub id: String,
    pub email: Option<String>,
}

/// Single-domain email allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPolicy {
    suffix: String,
}

impl DomainPolicy {
    /// `domain` without the `@`, e.g. `"edge-i.jp"`.
    #[must_use]
    pub fn new(domain: &str) -> Self {
        Self {
            suffix: format!("@{}", domain.trim_start_matches('@').to_ascii_lowercase()),
        }
    }

    /// The `@domain` suffix emails must end with.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Exact suffix match on `@domain`. Subdomains do not match.
    #[must_use]
    pub fn allows(&self, email: Option<&str>) -> bool {
        match email {
            Some(email) if !email.is_empty() => {
                email.to_ascii_lowercase().ends_with(&self.suffix)
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn allows_identity(&self, identity: &Identity) -> bool {
        self.allows(identity.email.as_deref())
    }
}

/// One-shot notice carried to the entry page in `?error=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorFlag {
    /// Signed in with an account outside the allowed domain.
    Unauthorized,
    /// The OAuth round trip failed.
    AuthFailed,
}

impl AuthErrorFlag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AuthErrorFlag::Unauthorized => "unauthorized",
            AuthErrorFlag::AuthFailed => "auth_failed",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            AuthErrorFlag::Unauthorized => {
                "This account is not permitted. Sign in with your organisation account."
            }
            AuthErrorFlag::AuthFailed => "Sign-in failed. Please try again.",
        }
    }
}

impl fmt::Display for AuthErrorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthErrorFlag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unauthorized" => Ok(AuthErrorFlag::Unauthorized),
            "auth_failed" => Ok(AuthErrorFlag::AuthFailed),
            _ => Err(()),
        }
    }
}

/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Send to the entry page. `sign_out` is set when the session belongs to a
    /// disallowed account and must be discarded.
    RedirectToEntry {
        flag: Option<AuthErrorFlag>,
        sign_out: bool,
    },
    RedirectToDashboard,
}

impl GateDecision {
    /// Location header for redirect decisions.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            GateDecision::Allow => None,
            GateDecision::RedirectToEntry { flag, .. } => Some(entry_location(*flag)),
            GateDecision::RedirectToDashboard => Some(DASHBOARD_PATH.to_string()),
        }
    }
}

/// `/` or `/?error=<flag>`.
#[must_use]
pub fn entry_location(flag: Option<AuthErrorFlag>) -> String {
    match flag {
        Some(flag) => format!("{ENTRY_PATH}?error={flag}"),
        None => ENTRY_PATH.to_string(),
    }
}

#[must_use]
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Decide what happens to a request for `path` given the current session.
#[must_use]
pub fn decide(path: &str, identity: Option<&Identity>, policy: &DomainPolicy) -> GateDecision {
    if is_protected(path) {
        return check_access(identity, policy);
    }

    if path == ENTRY_PATH && identity.is_some_and(|id| policy.allows_identity(id)) {
        return GateDecision::RedirectToDashboard;
    }

    GateDecision::Allow
}

/// The per-view check: signed in, and with an allowed email.
#[must_use]
pub fn check_access(identity: Option<&Identity>, policy: &DomainPolicy) -> GateDecision {
    match identity {
        None => GateDecision::RedirectToEntry {
            flag: None,
            sign_out: false,
        },
        Some(id) if !policy.allows_identity(id) => GateDecision::RedirectToEntry {
            flag: Some(AuthErrorFlag::Unauthorized),
            sign_out: true,
        },
        Some(_) => GateDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> DomainPolicy {
        DomainPolicy::new("edge-i.jp")
    }

    fn user(email: &str) -> Identity {
        Identity {
            id: "user-1".to_string(),
            email: Some(email.to_string()),
        }
    }

    #[test]
    fn allowed_domain_passes() {
        assert!(policy().allows(Some("user@edge-i.jp")));
        assert!(policy().allows(Some("User@Edge-I.JP")));
    }

    #[test]
    fn other_domain_is_rejected() {
        assert!(!policy().allows(Some("user@gmail.com")));
    }

    #[test]
    fn subdomain_is_rejected() {
        assert!(!policy().allows(Some("user@sub.edge-i.jp")));
    }

    #[test]
    fn lookalike_domain_is_rejected() {
        assert!(!policy().allows(Some("user@notedge-i.jp")));
    }

    #[test]
    fn missing_or_empty_email_is_rejected() {
        assert!(!policy().allows(None));
        assert!(!policy().allows(Some("")));
    }

    #[test]
    fn policy_accepts_leading_at() {
        assert_eq!(DomainPolicy::new("@edge-i.jp").suffix(), "@edge-i.jp");
    }

    #[test]
    fn protected_prefixes_match_whole_segments() {
        assert!(is_protected("/dashboard"));
        assert!(is_protected("/analysis/abc-123"));
        assert!(!is_protected("/dashboards"));
        assert!(!is_protected("/guide"));
        assert!(!is_protected("/"));
    }

    #[test]
    fn anonymous_on_protected_path_goes_to_entry() {
        let decision = decide("/dashboard", None, &policy());
        assert_eq!(
            decision,
            GateDecision::RedirectToEntry {
                flag: None,
                sign_out: false
            }
        );
        assert_eq!(decision.location().as_deref(), Some("/"));
    }

    #[test]
    fn disallowed_domain_is_signed_out_with_flag() {
        let who = user("someone@gmail.com");
        let decision = decide("/analysis/1", Some(&who), &policy());
        assert_eq!(
            decision,
            GateDecision::RedirectToEntry {
                flag: Some(AuthErrorFlag::Unauthorized),
                sign_out: true
            }
        );
        assert_eq!(decision.location().as_deref(), Some("/?error=unauthorized"));
    }

    #[test]
    fn allowed_user_passes_protected_path() {
        let who = user("staff@edge-i.jp");
        assert_eq!(decide("/dashboard", Some(&who), &policy()), GateDecision::Allow);
    }

    #[test]
    fn allowed_user_on_entry_goes_to_dashboard() {
        let who = user("staff@edge-i.jp");
        let decision = decide("/", Some(&who), &policy());
        assert_eq!(decision, GateDecision::RedirectToDashboard);
        assert_eq!(decision.location().as_deref(), Some("/dashboard"));
    }

    #[test]
    fn disallowed_user_on_entry_stays() {
        let who = user("someone@gmail.com");
        assert_eq!(decide("/", Some(&who), &policy()), GateDecision::Allow);
    }

    #[test]
    fn public_paths_are_allowed_for_anyone() {
        assert_eq!(decide("/guide", None, &policy()), GateDecision::Allow);
        assert_eq!(decide("/auth/callback", None, &policy()), GateDecision::Allow);
    }

    #[test]
    fn error_flag_round_trips() {
        for flag in [AuthErrorFlag::Unauthorized, AuthErrorFlag::AuthFailed] {
            assert_eq!(flag.as_str().parse::<AuthErrorFlag>(), Ok(flag));
        }
        assert!("other".parse::<AuthErrorFlag>().is_err());
    }
}
