use crate::params::{push_pair, ParameterSet};
use crate::signature::Signer;

pub const DEFAULT_API_ROOT: &str = "http://gamejolt.com/api/game/";
pub const DEFAULT_API_VERSION: &str = "v1";

/// Query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "signature";
/// Signature-exempt parameter, always rendered after the signature.
pub const USER_TOKEN_PARAM: &str = "user_token";

/// Service endpoints, relative to `{api_root}{version}/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    VerifyUser,
    Trophies,
    AchieveTrophy,
    FetchData,
    StoreData,
    RemoveData,
    DataKeys,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::VerifyUser => "users/auth/",
            Endpoint::Trophies => "trophies/",
            Endpoint::AchieveTrophy => "trophies/add-achieved/",
            Endpoint::FetchData => "data-store/",
            Endpoint::StoreData => "data-store/set/",
            Endpoint::RemoveData => "data-store/remove/",
            Endpoint::DataKeys => "data-store/get-keys/",
        }
    }
}

/// A username/token pair as handed out by the service.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub token: String,
}

impl User {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrophyFilter {
    All,
    Achieved,
    Unachieved,
}

/// A finalized, signed GET request.
///
/// The parameter set that was signed is the one rendered, so the two cannot
/// drift apart. Only the trailing `user_token` sits outside the signature.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    base_url: String,
    params: ParameterSet,
    signature: String,
    user_token: Option<String>,
}

impl SignedRequest {
    pub fn new(
        base_url: impl Into<String>,
        params: ParameterSet,
        signer: &Signer,
        user_token: Option<&str>,
    ) -> Self {
        let base_url = base_url.into();
        let signature = signer.sign(&base_url, &params);
        Self {
            base_url,
            params,
            signature,
            user_token: user_token.map(str::to_string),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// `{base}?{signed params}&signature={sig}[&user_token={token}]`
    pub fn url(&self) -> String {
        self.render(self.user_token.as_deref())
    }

    /// Same as [`url`](Self::url) with the user token masked, for logs.
    pub fn redacted_url(&self) -> String {
        self.render(self.user_token.as_ref().map(|_| "***"))
    }

    fn render(&self, user_token: Option<&str>) -> String {
        let mut url = self.base_url.clone();
        url.push_str(&self.params.to_query());
        url.push(if self.params.is_empty() { '?' } else { '&' });
        push_pair(&mut url, SIGNATURE_PARAM, &self.signature);
        if let Some(token) = user_token {
            url.push('&');
            push_pair(&mut url, USER_TOKEN_PARAM, token);
        }
        url
    }
}

impl std::fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted_url())
    }
}

/// Builds signed requests for one game.
#[derive(Clone, Debug)]
pub struct RequestBuilder {
    api_root: String,
    version: String,
    game_id: u64,
    signer: Signer,
}

impl RequestBuilder {
    pub fn new(game_id: u64, private_key: impl Into<String>) -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            game_id,
            signer: Signer::new(private_key),
        }
    }

    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        let mut root = api_root.into();
        if !root.ends_with('/') {
            root.push('/');
        }
        self.api_root = root;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}/{}", self.api_root, self.version, endpoint.path())
    }

    /// Prefix `game_id` to `params`, sign, and append the unsigned token.
    pub fn build(
        &self,
        endpoint: Endpoint,
        params: ParameterSet,
        user_token: Option<&str>,
    ) -> SignedRequest {
        let mut full = ParameterSet::new().with("game_id", self.game_id);
        for (name, value) in params.iter() {
            full.insert(name, value);
        }
        SignedRequest::new(self.endpoint_url(endpoint), full, &self.signer, user_token)
    }

    pub fn verify_user(&self, user: &User) -> SignedRequest {
        self.build(
            Endpoint::VerifyUser,
            ParameterSet::new().with("username", &user.username),
            Some(user.token.as_str()),
        )
    }

    pub fn trophies(&self, user: &User, filter: TrophyFilter) -> SignedRequest {
        let mut params = ParameterSet::new().with("username", &user.username);
        match filter {
            TrophyFilter::All => {}
            TrophyFilter::Achieved => params.insert("achieved", true),
            TrophyFilter::Unachieved => params.insert("achieved", false),
        }
        self.build(Endpoint::Trophies, params, Some(user.token.as_str()))
    }

    pub fn trophy(&self, user: &User, trophy_id: u64) -> SignedRequest {
        let params = ParameterSet::new()
            .with("username", &user.username)
            .with("trophy_id", trophy_id);
        self.build(Endpoint::Trophies, params, Some(user.token.as_str()))
    }

    pub fn achieve_trophy(&self, user: &User, trophy_id: u64) -> SignedRequest {
        let params = ParameterSet::new()
            .with("username", &user.username)
            .with("trophy_id", trophy_id);
        self.build(Endpoint::AchieveTrophy, params, Some(user.token.as_str()))
    }

    /// `user` selects the user-scoped store; `None` is the game-wide store.
    pub fn fetch_data(&self, key: &str, user: Option<&User>) -> SignedRequest {
        let mut params = ParameterSet::new().with("key", key);
        if let Some(user) = user {
            params.insert("username", &user.username);
        }
        params.insert("format", "dump");
        self.build(Endpoint::FetchData, params, user.map(|u| u.token.as_str()))
    }

    pub fn store_data(&self, key: &str, data: &str, user: Option<&User>) -> SignedRequest {
        let mut params = ParameterSet::new().with("key", key).with("data", data);
        if let Some(user) = user {
            params.insert("username", &user.username);
        }
        self.build(Endpoint::StoreData, params, user.map(|u| u.token.as_str()))
    }

    pub fn remove_data(&self, key: &str, user: Option<&User>) -> SignedRequest {
        let mut params = ParameterSet::new().with("key", key);
        if let Some(user) = user {
            params.insert("username", &user.username);
        }
        self.build(Endpoint::RemoveData, params, user.map(|u| u.token.as_str()))
    }

    pub fn data_keys(&self, user: Option<&User>) -> SignedRequest {
        let mut params = ParameterSet::new();
        if let Some(user) = user {
            params.insert("username", &user.username);
        }
        self.build(Endpoint::DataKeys, params, user.map(|u| u.token.as_str()))
    }
}
