// Cookie-backed session returned by the user API and the credentials used to obtain it.

/// Cookie pairs issued by a successful login or registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    // Insertion order is kept so the rendered header is stable.
    cookies: Vec<(String, String)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cookie, replacing any earlier value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|pair| pair.0 == name) {
            Some(slot) => slot.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|pair| pair.0 == name)
            .map(|pair| pair.1.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Renders the session as a `Cookie` request header value (`a=1; b=2`).
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K, V> FromIterator<(K, V)> for Session
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut session = Session::new();
        for (name, value) in iter {
            session.insert(name, value);
        }
        session
    }
}

/// Login/registration payload for one synthetic user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub username: String,
}

impl Credentials {
    /// Builds the synthetic credentials for user `index`, e.g. `user7@test.com` / `user7`.
    pub fn synthetic(index: usize, prefix: &str, email_domain: &str, password: &str) -> Self {
        let username = format!("{prefix}{index}");
        Self {
            email: format!("{username}@{email_domain}"),
            password: password.to_string(),
            username,
        }
    }
}
