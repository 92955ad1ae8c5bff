use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for role identifiers outside the registered set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(pub String);

/// Professional role a prompt is refined for.
///
/// The set is closed: every agent directive embeds the role's guidance text,
/// so an unknown identifier fails at the boundary before any stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    WebDev,
    SysEng,
    Analyst,
    Designer,
}

impl Role {
    /// All registered roles, in a stable order
    pub const ALL: [Role; 4] = [Role::WebDev, Role::SysEng, Role::Analyst, Role::Designer];

    /// Stable identifier used in CLI arguments and message metadata
    pub fn id(&self) -> &'static str {
        match self {
            Role::WebDev => "webdev",
            Role::SysEng => "syseng",
            Role::Analyst => "analyst",
            Role::Designer => "designer",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::WebDev => "Web Developer",
            Role::SysEng => "System Engineer",
            Role::Analyst => "Data Analyst",
            Role::Designer => "UX Designer",
        }
    }

    /// Role-specific guidance injected into every stage directive
    pub fn guidance(&self) -> &'static str {
        match self {
            Role::WebDev => {
                "You are an expert web developer prompt engineer.\n\
                 Analyze and improve prompts related to web development, focusing on:\n\
                 - Frontend and backend best practices\n\
                 - Modern web technologies and frameworks\n\
                 - Performance and security considerations"
            }
            Role::SysEng => {
                "You are an expert system engineer prompt engineer.\n\
                 Analyze and improve prompts related to system engineering, focusing on:\n\
                 - Scalability and reliability\n\
                 - Infrastructure and deployment practices\n\
                 - Observability and operational concerns"
            }
            Role::Analyst => {
                "You are an expert data analyst prompt engineer.\n\
                 Analyze and improve prompts related to data analysis, focusing on:\n\
                 - Data processing and visualization\n\
                 - Statistical analysis\n\
                 - Business intelligence"
            }
            Role::Designer => {
                "You are an expert UX designer prompt engineer.\n\
                 Analyze and improve prompts related to design, focusing on:\n\
                 - User experience and interface design\n\
                 - Design systems and patterns\n\
                 - Accessibility and usability"
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webdev" | "web-dev" | "web" => Ok(Role::WebDev),
            "syseng" | "sys-eng" | "systems" => Ok(Role::SysEng),
            "analyst" | "data-analyst" => Ok(Role::Analyst),
            "designer" | "ux" => Ok(Role::Designer),
            _ => Err(UnknownRoleError(s.to_string())),
        }
    }
}
