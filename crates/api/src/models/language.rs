use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the indexers understand.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LanguageType {
    C,
    Cpp,
    Java,
}

impl LanguageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageType::C => "c",
            LanguageType::Cpp => "cpp",
            LanguageType::Java => "java",
        }
    }

    /// The standard used when a source group leaves its standard empty.
    pub fn default_standard(&self) -> &'static str {
        match self {
            LanguageType::C => "c11",
            LanguageType::Cpp => "c++17",
            LanguageType::Java => "10",
        }
    }

    pub fn indexer_command_type(&self) -> IndexerCommandType {
        match self {
            LanguageType::C | LanguageType::Cpp => IndexerCommandType::Cxx,
            LanguageType::Java => IndexerCommandType::Java,
        }
    }

    /// Map a file extension to a language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "java" => Some(LanguageType::Java),
            "c" => Some(LanguageType::C),
            "h" | "hh" | "hpp" | "hxx" | "cc" | "cpp" | "cxx" | "c++" => Some(LanguageType::Cpp),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant carried by every indexer command.
///
/// The set is closed: each variant is served by exactly one indexer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IndexerCommandType {
    Cxx,
    Java,
}

impl IndexerCommandType {
    pub const ALL: [IndexerCommandType; 2] = [IndexerCommandType::Cxx, IndexerCommandType::Java];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexerCommandType::Cxx => "cxx",
            IndexerCommandType::Java => "java",
        }
    }
}

impl fmt::Display for IndexerCommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexerCommandType {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        match s {
            "cxx" => Ok(IndexerCommandType::Cxx),
            "java" => Ok(IndexerCommandType::Java),
            other => Err(ApiError::UnknownToken {
                kind: "indexer command type",
                token: other.to_string(),
            }),
        }
    }
}

/// The build-system flavour of a source group.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceGroupType {
    CEmpty,
    CppEmpty,
    CxxCdb,
    JavaEmpty,
    JavaMaven,
    JavaGradle,
}

impl SourceGroupType {
    pub const ALL: [SourceGroupType; 6] = [
        SourceGroupType::CEmpty,
        SourceGroupType::CppEmpty,
        SourceGroupType::CxxCdb,
        SourceGroupType::JavaEmpty,
        SourceGroupType::JavaMaven,
        SourceGroupType::JavaGradle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceGroupType::CEmpty => "C Source Group",
            SourceGroupType::CppEmpty => "C++ Source Group",
            SourceGroupType::CxxCdb => "C/C++ from Compilation Database",
            SourceGroupType::JavaEmpty => "Java Source Group",
            SourceGroupType::JavaMaven => "Maven Source Group",
            SourceGroupType::JavaGradle => "Gradle Source Group",
        }
    }

    pub fn language(&self) -> LanguageType {
        match self {
            SourceGroupType::CEmpty => LanguageType::C,
            SourceGroupType::CppEmpty | SourceGroupType::CxxCdb => LanguageType::Cpp,
            SourceGroupType::JavaEmpty | SourceGroupType::JavaMaven | SourceGroupType::JavaGradle => {
                LanguageType::Java
            }
        }
    }
}

impl fmt::Display for SourceGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceGroupType {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        SourceGroupType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ApiError::UnknownToken {
                kind: "source group type",
                token: s.to_string(),
            })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceGroupStatus {
    #[default]
    Enabled,
    Disabled,
}

impl SourceGroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceGroupStatus::Enabled => "enabled",
            SourceGroupStatus::Disabled => "disabled",
        }
    }
}

impl fmt::Display for SourceGroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceGroupStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        match s {
            "enabled" => Ok(SourceGroupStatus::Enabled),
            "disabled" => Ok(SourceGroupStatus::Disabled),
            other => Err(ApiError::UnknownToken {
                kind: "source group status",
                token: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_group_type_tokens_round_trip() {
        for t in SourceGroupType::ALL {
            assert_eq!(t.as_str().parse::<SourceGroupType>().unwrap(), t);
        }
        assert!("Rust Source Group".parse::<SourceGroupType>().is_err());
    }

    #[test]
    fn language_is_a_function_of_type() {
        assert_eq!(SourceGroupType::CEmpty.language(), LanguageType::C);
        assert_eq!(SourceGroupType::CxxCdb.language(), LanguageType::Cpp);
        assert_eq!(SourceGroupType::JavaGradle.language(), LanguageType::Java);
        assert_eq!(
            LanguageType::Cpp.indexer_command_type(),
            IndexerCommandType::Cxx
        );
    }

    #[test]
    fn status_tokens() {
        assert_eq!("disabled".parse::<SourceGroupStatus>().unwrap(), SourceGroupStatus::Disabled);
        assert_eq!(SourceGroupStatus::default().as_str(), "enabled");
        assert!("on".parse::<SourceGroupStatus>().is_err());
    }
}
