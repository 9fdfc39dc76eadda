//! Static route table and route guards.

use std::str::FromStr;

use crate::session::{Role, SessionService};
use crate::wizard::FlowKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardKind {
    Ngo,
    Donor,
    Talent,
}

impl DashboardKind {
    pub fn all() -> &'static [DashboardKind] {
        &[DashboardKind::Ngo, DashboardKind::Donor, DashboardKind::Talent]
    }

    /// Home dashboard for a role
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::NgoAdmin => DashboardKind::Ngo,
            Role::Donor | Role::Individual => DashboardKind::Donor,
            Role::Volunteer => DashboardKind::Talent,
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            DashboardKind::Ngo => "/dashboard/ngo",
            DashboardKind::Donor => "/dashboard/donor",
            DashboardKind::Talent => "/dashboard/talent",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DashboardKind::Ngo => "NGO Dashboard",
            DashboardKind::Donor => "Donor Dashboard",
            DashboardKind::Talent => "Volunteer Dashboard",
        }
    }

    /// Onboarding flow offered from this dashboard
    pub fn onboarding_flow(&self) -> FlowKind {
        match self {
            DashboardKind::Ngo => FlowKind::Ngo,
            DashboardKind::Donor => FlowKind::Donor,
            DashboardKind::Talent => FlowKind::Talent,
        }
    }
}

impl FromStr for DashboardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ngo" => Ok(DashboardKind::Ngo),
            "donor" => Ok(DashboardKind::Donor),
            "talent" | "volunteer" => Ok(DashboardKind::Talent),
            other => Err(format!(
                "unknown dashboard '{other}' (expected ngo, donor or talent)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Profile,
    Dashboard(DashboardKind),
    /// `step` is the 1-based index within the flow
    Onboarding { flow: FlowKind, step: usize },
    NotFound,
}

impl Page {
    /// Human-readable name for route listings
    pub fn describe(&self) -> String {
        match self {
            Page::Home => "Home".to_string(),
            Page::Login => "Sign in".to_string(),
            Page::Profile => "Profile".to_string(),
            Page::Dashboard(kind) => kind.title().to_string(),
            Page::Onboarding { flow, step } => {
                let label = flow.steps().get(step - 1).map_or("?", |s| s.label);
                format!("{} · step {step} ({label})", flow.label())
            }
            Page::NotFound => "Not found".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Public,
    /// Requires a session; redirects to the login page otherwise
    Authenticated,
    /// Only for visitors; signed-in users go to their dashboard
    GuestOnly,
}

impl Guard {
    pub fn label(&self) -> &'static str {
        match self {
            Guard::Public => "public",
            Guard::Authenticated => "signed in",
            Guard::GuestOnly => "guest only",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub page: Page,
    pub guard: Guard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Page),
    Redirect(&'static str),
    /// The session is still being restored; show a placeholder
    Pending,
}

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const PROFILE_PATH: &str = "/profile";

pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        let mut routes = vec![
            Route {
                path: HOME_PATH,
                page: Page::Home,
                guard: Guard::Public,
            },
            Route {
                path: LOGIN_PATH,
                page: Page::Login,
                guard: Guard::GuestOnly,
            },
            Route {
                path: PROFILE_PATH,
                page: Page::Profile,
                guard: Guard::Authenticated,
            },
        ];

        routes.extend(DashboardKind::all().iter().map(|kind| Route {
            path: kind.route(),
            page: Page::Dashboard(*kind),
            guard: Guard::Authenticated,
        }));

        // Onboarding is open to visitors, as on the public site
        for flow in FlowKind::all() {
            routes.extend(flow.steps().iter().enumerate().map(|(pos, step)| Route {
                path: step.route,
                page: Page::Onboarding {
                    flow: *flow,
                    step: pos + 1,
                },
                guard: Guard::Public,
            }));
        }

        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn find(&self, path: &str) -> Option<&Route> {
        let path = normalize(path);
        self.routes.iter().find(|r| r.path == path)
    }

    /// Decide what to show for `path` given the current session
    pub fn resolve(&self, path: &str, session: &dyn SessionService) -> Resolution {
        let Some(route) = self.find(path) else {
            return Resolution::Render(Page::NotFound);
        };

        match route.guard {
            Guard::Public => Resolution::Render(route.page),
            _ if session.is_loading() => Resolution::Pending,
            Guard::Authenticated => {
                if session.is_authenticated() {
                    Resolution::Render(route.page)
                } else {
                    tracing::debug!(path = route.path, "Guarded route, redirecting to login");
                    Resolution::Redirect(LOGIN_PATH)
                }
            }
            Guard::GuestOnly => match session.current_user() {
                Some(user) => Resolution::Redirect(DashboardKind::for_role(user.role).route()),
                None => Resolution::Render(route.page),
            },
        }
    }
}

/// Drop a trailing slash (except for the root)
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{mock_profile, AuthError, User, UserPatch};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Session fake that never touches storage
    struct FakeSession {
        user: Mutex<Option<User>>,
        loading: bool,
    }

    impl FakeSession {
        fn signed_out() -> Self {
            Self {
                user: Mutex::new(None),
                loading: false,
            }
        }

        fn signed_in(role: Role) -> Self {
            let mut user = mock_profile("a@b.com");
            user.role = role;
            Self {
                user: Mutex::new(Some(user)),
                loading: false,
            }
        }

        fn loading() -> Self {
            Self {
                user: Mutex::new(None),
                loading: true,
            }
        }
    }

    #[async_trait]
    impl SessionService for FakeSession {
        fn initialize(&self) {}

        async fn login(&self, email: &str, _password: &str) -> Result<User, AuthError> {
            let user = mock_profile(email);
            *self.user.lock().unwrap() = Some(user.clone());
            Ok(user)
        }

        fn logout(&self) {
            *self.user.lock().unwrap() = None;
        }

        fn update_user(&self, patch: UserPatch) {
            if let Some(user) = self.user.lock().unwrap().as_mut() {
                user.apply(patch);
            }
        }

        fn current_user(&self) -> Option<User> {
            self.user.lock().unwrap().clone()
        }

        fn is_loading(&self) -> bool {
            self.loading
        }
    }

    #[test]
    fn test_dashboard_requires_session() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/dashboard/ngo", &FakeSession::signed_out()),
            Resolution::Redirect(LOGIN_PATH)
        );
        assert_eq!(
            router.resolve("/dashboard/ngo", &FakeSession::signed_in(Role::NgoAdmin)),
            Resolution::Render(Page::Dashboard(DashboardKind::Ngo))
        );
    }

    #[test]
    fn test_guarded_route_pending_while_loading() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/profile", &FakeSession::loading()),
            Resolution::Pending
        );
        // Public pages never wait on the session
        assert_eq!(
            router.resolve("/", &FakeSession::loading()),
            Resolution::Render(Page::Home)
        );
    }

    #[test]
    fn test_login_redirects_signed_in_user_to_role_dashboard() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/login", &FakeSession::signed_in(Role::Volunteer)),
            Resolution::Redirect("/dashboard/talent")
        );
        assert_eq!(
            router.resolve("/login", &FakeSession::signed_out()),
            Resolution::Render(Page::Login)
        );
    }

    #[test]
    fn test_onboarding_routes_are_public() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/onboarding/donor/geography", &FakeSession::signed_out()),
            Resolution::Render(Page::Onboarding {
                flow: FlowKind::Donor,
                step: 3
            })
        );
    }

    #[test]
    fn test_unknown_and_trailing_slash_paths() {
        let router = Router::new();
        let session = FakeSession::signed_in(Role::Donor);
        assert_eq!(
            router.resolve("/nowhere", &session),
            Resolution::Render(Page::NotFound)
        );
        assert_eq!(
            router.resolve("/dashboard/donor/", &session),
            Resolution::Render(Page::Dashboard(DashboardKind::Donor))
        );
    }

    #[test]
    fn test_route_table_has_every_wizard_step() {
        let router = Router::new();
        let step_count: usize = FlowKind::all().iter().map(|f| f.steps().len()).sum();
        let onboarding = router
            .routes()
            .iter()
            .filter(|r| matches!(r.page, Page::Onboarding { .. }))
            .count();
        assert_eq!(onboarding, step_count);
    }

    #[test]
    fn test_dashboard_names_parse() {
        assert_eq!("NGO".parse::<DashboardKind>(), Ok(DashboardKind::Ngo));
        assert_eq!("volunteer".parse::<DashboardKind>(), Ok(DashboardKind::Talent));
        assert!("admin".parse::<DashboardKind>().is_err());
    }

    #[test]
    fn test_role_dashboards() {
        assert_eq!(DashboardKind::for_role(Role::NgoAdmin), DashboardKind::Ngo);
        assert_eq!(DashboardKind::for_role(Role::Individual), DashboardKind::Donor);
        assert_eq!(DashboardKind::for_role(Role::Donor), DashboardKind::Donor);
        assert_eq!(DashboardKind::for_role(Role::Volunteer), DashboardKind::Talent);
    }

    #[test]
    fn test_fake_session_substitutes_for_store() {
        let session = FakeSession::signed_out();
        let router = Router::new();
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(session.login("x@y.org", "anything")).unwrap();
        assert_eq!(
            router.resolve("/profile", &session),
            Resolution::Render(Page::Profile)
        );
        session.logout();
        assert_eq!(
            router.resolve("/profile", &session),
            Resolution::Redirect(LOGIN_PATH)
        );
    }
}
