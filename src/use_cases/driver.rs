use std::fmt;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span};

use crate::domain::{AuthError, AuthProvider, Credentials, GameConnector, Session};
use crate::use_cases::play::play;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Inputs for one load-test run.
#[derive(Debug, Clone)]
pub struct DriverSettings {
    pub num_clients: usize,
    pub auth_mode: AuthMode,
    pub password: String,
    pub user_prefix: String,
    pub email_domain: String,
}

impl DriverSettings {
    pub fn credentials(&self, user_index: usize) -> Credentials {
        Credentials::synthetic(
            user_index,
            &self.user_prefix,
            &self.email_domain,
            &self.password,
        )
    }
}

#[derive(Debug)]
pub enum DriverError {
    // Auth for one user failed; no game connection was opened.
    Auth {
        user_index: usize,
        source: AuthError,
    },
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Auth { user_index, source } => {
                write!(f, "authentication failed for user {user_index}: {source}")
            }
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Auth { source, .. } => Some(source),
        }
    }
}

/// Authenticates every synthetic user serially, then plays all games concurrently.
///
/// Returns the number of workers joined once every game has ended.
pub async fn run_load_test<A, C>(
    settings: &DriverSettings,
    auth: &A,
    connector: Arc<C>,
) -> Result<usize, DriverError>
where
    A: AuthProvider + ?Sized,
    C: GameConnector + ?Sized + 'static,
{
    // Logins stay serial and finish before the first socket is opened.
    let mut sessions = Vec::with_capacity(settings.num_clients);
    for user_index in 0..settings.num_clients {
        let credentials = settings.credentials(user_index);
        let session = authenticate(settings.auth_mode, auth, &credentials)
            .await
            .map_err(|source| {
                error!(user_index, error = %source, "authentication failed; aborting run");
                DriverError::Auth { user_index, source }
            })?;
        debug!(user_index, cookies = session.len(), "user authenticated");
        sessions.push(session);
    }

    let mut workers = JoinSet::new();
    for (user_index, session) in sessions.into_iter().enumerate() {
        let connector = Arc::clone(&connector);
        workers.spawn(
            async move {
                debug!("worker started");
                play(user_index, session, connector.as_ref()).await
            }
            .instrument(info_span!("worker", user_id = user_index)),
        );
    }
    info!(workers = workers.len(), "workers started");

    let mut joined = 0;
    while let Some(result) = workers.join_next().await {
        joined += 1;
        // Outcomes are already logged by each worker.
        if let Err(e) = result {
            error!(error = %e, "worker task panicked");
        }
    }

    info!(workers = joined, "all workers finished");
    Ok(joined)
}

async fn authenticate<A>(
    mode: AuthMode,
    auth: &A,
    credentials: &Credentials,
) -> Result<Session, AuthError>
where
    A: AuthProvider + ?Sized,
{
    match mode {
        AuthMode::Login => auth.login(&credentials.email, &credentials.password).await,
        AuthMode::Register => auth.register(credentials).await,
    }
}
