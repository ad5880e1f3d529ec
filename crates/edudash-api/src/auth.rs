// Session authentication
//
// Cookie-based login/logout. The login endpoint sets a session cookie in
// the client's jar; subsequent requests carry it automatically. Success
// and failure are distinguished by HTTP status only -- the login body is
// never inspected on success.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{ApiClient, preview};
use crate::error::Error;
use crate::models::ErrorBody;

const LOGIN_PATH: &str = "auth/login";
const LOGOUT_PATH: &str = "auth/logout";

impl ApiClient {
    /// Authenticate with email/password.
    ///
    /// `POST auth/login` with `{ "email", "password" }`. Any 2xx status is
    /// success; every other status is [`Error::Authentication`] carrying the
    /// backend's message when it sends one.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!("logging in at {}", url);

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| preview(&body).to_owned());
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {detail}"),
            });
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// `POST auth/logout`. The response status is logged but not enforced:
    /// an already-expired session is as good as a closed one.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.endpoint(LOGOUT_PATH)?;
        debug!("logging out at {}", url);

        let resp = self.http().post(url).send().await?;

        debug!(status = %resp.status(), "logout complete");
        Ok(())
    }
}
