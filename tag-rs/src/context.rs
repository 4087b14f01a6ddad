//! Caller-side binding helpers.
//!
//! The bot renders the same few shapes over and over: the invoking `user`,
//! the `server`, the `moderator` of a case, a `reason`, command `args`,
//! level-up numbers and `mentions`.  [`Bindings`] collects them in the order
//! they are supplied and hands them to the renderer as `[name, value]` pairs.

use crate::script::{Renderer, Value};

/// A chat user, as exposed to templates under `user` / `moderator`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar_url: Option<String>,
    pub bot: bool,
}

impl UserInfo {
    pub fn new(id: impl Into<String>, username: impl Into<String>, discriminator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            discriminator: discriminator.into(),
            ..Self::default()
        }
    }

    /// `username#discriminator`.
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    /// Platform mention syntax, `<@id>`.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    pub fn to_value(&self) -> Value {
        Value::dict([
            ("id", Value::from(self.id.as_str())),
            ("username", Value::from(self.username.as_str())),
            ("discriminator", Value::from(self.discriminator.as_str())),
            ("avatarURL", Value::from(self.avatar_url.clone())),
            ("tag", Value::from(self.tag())),
            ("mention", Value::from(self.mention())),
            ("bot", Value::from(self.bot)),
        ])
    }
}

/// A server (guild), as exposed to templates under `server`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub id: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub owner_id: String,
    pub member_count: u64,
}

impl ServerInfo {
    pub fn to_value(&self) -> Value {
        Value::dict([
            ("id", Value::from(self.id.as_str())),
            ("name", Value::from(self.name.as_str())),
            ("iconURL", Value::from(self.icon_url.clone())),
            ("ownerID", Value::from(self.owner_id.as_str())),
            ("memberCount", Value::from(self.member_count)),
        ])
    }
}

/// Ordered `[name, value]` pairs for one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    pairs: Vec<(String, Value)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary binding.  A later binding of the same name wins.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.pairs.push((name.into(), value.into()));
        self
    }

    pub fn user(self, user: &UserInfo) -> Self {
        self.with("user", user.to_value())
    }

    pub fn moderator(self, moderator: &UserInfo) -> Self {
        self.with("moderator", moderator.to_value())
    }

    pub fn server(self, server: &ServerInfo) -> Self {
        self.with("server", server.to_value())
    }

    pub fn reason(self, reason: impl Into<String>) -> Self {
        self.with("reason", Value::Str(reason.into()))
    }

    pub fn args<S: Into<String>>(self, args: impl IntoIterator<Item = S>) -> Self {
        self.with("args", Value::list(args.into_iter().map(Into::into).collect::<Vec<String>>()))
    }

    /// `level` and `oldLevel` for level-up announcements.
    pub fn levels(self, level: u64, old_level: u64) -> Self {
        self.with("level", level).with("oldLevel", old_level)
    }

    /// The level reward, or `null` when there is none.
    pub fn reward(self, reward: Option<Value>) -> Self {
        self.with("reward", reward.unwrap_or(Value::Null))
    }

    pub fn mentions<S: Into<String>>(self, ids: impl IntoIterator<Item = S>) -> Self {
        self.with("mentions", Value::list(ids.into_iter().map(Into::into).collect::<Vec<String>>()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render `template` with these bindings, returning the last
    /// substitution.
    pub fn render(self, template: &str) -> String {
        Renderer::new().render(template, self)
    }

    /// Render `template` with these bindings, returning the full text.
    pub fn expand(self, template: &str) -> String {
        Renderer::new().expand(template, self)
    }
}

impl IntoIterator for Bindings {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self { pairs: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
