use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::QueryError;
use crate::graphql::scalars::Timestamp;

/// A user, keyed by GitHub login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub github_login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(github_login: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            github_login: github_login.into(),
            name: Some(name.into()),
            avatar: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhotoCategory {
    Selfie,
    #[default]
    Portrait,
    Action,
    Landscape,
    Graphic,
}

impl PhotoCategory {
    pub const ALL: [PhotoCategory; 5] = [
        PhotoCategory::Selfie,
        PhotoCategory::Portrait,
        PhotoCategory::Action,
        PhotoCategory::Landscape,
        PhotoCategory::Graphic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoCategory::Selfie => "SELFIE",
            PhotoCategory::Portrait => "PORTRAIT",
            PhotoCategory::Action => "ACTION",
            PhotoCategory::Landscape => "LANDSCAPE",
            PhotoCategory::Graphic => "GRAPHIC",
        }
    }
}

impl fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoCategory {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhotoCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                QueryError::validation(
                    "category",
                    format!("'{}' is not a valid PhotoCategory", s),
                )
            })
    }
}

/// A posted photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: PhotoCategory,
    /// Owner's GitHub login
    #[serde(default)]
    pub github_user: Option<String>,
    pub created: Timestamp,
}

/// Association between a photo and a user tagged in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "photoID")]
    pub photo_id: String,
    /// GitHub login of the tagged user
    #[serde(rename = "userID")]
    pub user_login: String,
}

impl Tag {
    pub fn new(photo_id: impl Into<String>, user_login: impl Into<String>) -> Self {
        Self {
            photo_id: photo_id.into(),
            user_login: user_login.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_enum_names() {
        assert_eq!("ACTION".parse::<PhotoCategory>().unwrap(), PhotoCategory::Action);
        assert_eq!(PhotoCategory::default(), PhotoCategory::Portrait);

        let err = "action".parse::<PhotoCategory>().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn photo_deserializes_from_seed_shape() {
        let yaml = r#"
id: "9"
name: Powder day
githubUser: gPlake
created: 3-18-1977
"#;
        let photo: Photo = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(photo.category, PhotoCategory::Portrait);
        assert_eq!(photo.github_user.as_deref(), Some("gPlake"));
        assert_eq!(photo.created, Timestamp::raw("3-18-1977"));
    }

    #[test]
    fn tag_uses_original_field_names() {
        let tag: Tag = serde_yaml::from_str("photoID: \"2\"\nuserID: sSchmidt\n").unwrap();
        assert_eq!(tag, Tag::new("2", "sSchmidt"));
    }
}
