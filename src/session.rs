use crate::models::User;
use tokio::sync::watch;
use tracing::debug;

/// Who is signed in, plus the status of the last auth/profile action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub current_user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Every way the session can change
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SignInStart,
    SignInSuccess(User),
    SignInFailure(String),
    SignUpStart,
    SignUpSuccess,
    SignUpFailure(String),
    UpdateUserStart,
    UpdateUserSuccess(User),
    UpdateUserFailure(String),
    DeleteUserStart,
    DeleteUserSuccess,
    DeleteUserFailure(String),
    SignOutStart,
    SignOutSuccess,
    SignOutFailure(String),
}

impl SessionAction {
    fn name(&self) -> &'static str {
        match self {
            SessionAction::SignInStart => "sign_in_start",
            SessionAction::SignInSuccess(_) => "sign_in_success",
            SessionAction::SignInFailure(_) => "sign_in_failure",
            SessionAction::SignUpStart => "sign_up_start",
            SessionAction::SignUpSuccess => "sign_up_success",
            SessionAction::SignUpFailure(_) => "sign_up_failure",
            SessionAction::UpdateUserStart => "update_user_start",
            SessionAction::UpdateUserSuccess(_) => "update_user_success",
            SessionAction::UpdateUserFailure(_) => "update_user_failure",
            SessionAction::DeleteUserStart => "delete_user_start",
            SessionAction::DeleteUserSuccess => "delete_user_success",
            SessionAction::DeleteUserFailure(_) => "delete_user_failure",
            SessionAction::SignOutStart => "sign_out_start",
            SessionAction::SignOutSuccess => "sign_out_success",
            SessionAction::SignOutFailure(_) => "sign_out_failure",
        }
    }
}

impl SessionState {
    pub fn reduce(&mut self, action: SessionAction) {
        use SessionAction::*;

        match action {
            SignInStart | SignUpStart | UpdateUserStart | DeleteUserStart | SignOutStart => {
                self.loading = true;
                self.error = None;
            }
            SignInSuccess(user) | UpdateUserSuccess(user) => {
                self.current_user = Some(user);
                self.loading = false;
                self.error = None;
            }
            SignUpSuccess => {
                self.loading = false;
                self.error = None;
            }
            DeleteUserSuccess | SignOutSuccess => {
                self.current_user = None;
                self.loading = false;
                self.error = None;
            }
            SignInFailure(message)
            | SignUpFailure(message)
            | UpdateUserFailure(message)
            | DeleteUserFailure(message)
            | SignOutFailure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }
}

/// Shared session, changed only through [`SessionStore::dispatch`]
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _rx) = watch::channel(SessionState::default());
        Self { state }
    }

    pub fn dispatch(&self, action: SessionAction) {
        debug!("session action: {}", action.name());
        self.state.send_modify(|state| state.reduce(action));
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user.clone()
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.state
            .borrow()
            .current_user
            .as_ref()
            .map(|user| user.id.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
