use crate::api::AuthApi;
use crate::error::ApiError;
use crate::models::{Credentials, SignUp};
use crate::routes::Route;
use crate::session::{SessionAction, SessionStore};
use tracing::info;

/// Register an account; on success the user is sent to the sign-in page
pub async fn sign_up(
    api: &dyn AuthApi,
    session: &SessionStore,
    request: &SignUp,
) -> Result<Route, ApiError> {
    session.dispatch(SessionAction::SignUpStart);
    match api.sign_up(request).await {
        Ok(()) => {
            info!("Registered {}", request.email);
            session.dispatch(SessionAction::SignUpSuccess);
            Ok(Route::SignIn)
        }
        Err(err) => {
            session.dispatch(SessionAction::SignUpFailure(err.to_string()));
            Err(err)
        }
    }
}

/// Sign in and store the account in the session
pub async fn sign_in(
    api: &dyn AuthApi,
    session: &SessionStore,
    credentials: &Credentials,
) -> Result<Route, ApiError> {
    session.dispatch(SessionAction::SignInStart);
    match api.sign_in(credentials).await {
        Ok(user) => {
            info!("Signed in as {}", user.username);
            session.dispatch(SessionAction::SignInSuccess(user));
            Ok(Route::Home)
        }
        Err(err) => {
            session.dispatch(SessionAction::SignInFailure(err.to_string()));
            Err(err)
        }
    }
}
