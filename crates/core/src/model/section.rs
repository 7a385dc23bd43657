use std::fmt;

/// Top-level views of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    Profile,
    Leaderboard,
    Results,
    Phish,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::Profile,
        Section::Leaderboard,
        Section::Results,
        Section::Phish,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Profile => "profile",
            Section::Leaderboard => "leaderboard",
            Section::Results => "results",
            Section::Phish => "phish",
        }
    }

    /// Parse a persisted section name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == raw.trim())
    }

    /// Parse a section name, falling back to `Home` for anything unknown.
    #[must_use]
    pub fn parse_or_home(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(Section::Home)
    }

    /// Home and results both render the education view.
    #[must_use]
    pub fn shows_education(self) -> bool {
        matches!(self, Section::Home | Section::Results)
    }

    /// Sections a returning visitor may be sent back to on startup.
    #[must_use]
    pub fn is_restorable(self) -> bool {
        !matches!(self, Section::Phish)
    }

    /// Browser path for the section; profile paths carry the username.
    #[must_use]
    pub fn url_path(self, username: Option<&str>) -> String {
        match (self, username) {
            (Section::Home | Section::Results, _) => "/".to_string(),
            (Section::Profile, Some(name)) if !name.is_empty() => format!("/profile/{name}"),
            (section, _) => format!("/{}", section.as_str()),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Anything other than `light` reads as the default dark theme.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// External identity providers the site redirects to for sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginProvider {
    Google,
    Microsoft,
}

impl LoginProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LoginProvider::Google => "google",
            LoginProvider::Microsoft => "microsoft",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "google" => Some(LoginProvider::Google),
            "microsoft" => Some(LoginProvider::Microsoft),
            _ => None,
        }
    }

    /// Redirect path that brings the visitor back to `return_to` afterwards.
    #[must_use]
    pub fn login_path(self, return_to: Section) -> String {
        format!("/login/{}?return_to={}", self.as_str(), return_to.as_str())
    }
}
