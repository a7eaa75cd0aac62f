use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{ConfigError, ConfigResult};
use crate::graphql::scalars::Timestamp;
use crate::store::records::{Photo, PhotoCategory, Tag, User};

/// Initial contents of a record store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl SeedData {
    /// Load a seed dataset from a YAML file
    pub fn from_yaml_file(path: &Path) -> ConfigResult<Self> {
        info!("Loading seed data from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let seed: SeedData = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            "Loaded {} users, {} photos, {} tags",
            seed.users.len(),
            seed.photos.len(),
            seed.tags.len()
        );
        Ok(seed)
    }
}

/// The built-in PhotoShare dataset
pub fn default_seed() -> SeedData {
    let users = vec![
        User::new("mHattrup", "Mike Hattrup"),
        User::new("gPlake", "Glen Plake"),
        User::new("sSchmidt", "Scot Schmidt"),
    ];

    let photos = vec![
        Photo {
            id: "1".to_string(),
            name: "Dropping the Heart Chute".to_string(),
            description: Some("The heart chute is one of my favorite chutes".to_string()),
            category: PhotoCategory::Action,
            github_user: Some("gPlake".to_string()),
            created: Timestamp::raw("3-18-1977"),
        },
        Photo {
            id: "2".to_string(),
            name: "Enjoying the sunshine".to_string(),
            description: None,
            category: PhotoCategory::Selfie,
            github_user: Some("sSchmidt".to_string()),
            created: Timestamp::raw("1-2-1985"),
        },
        Photo {
            id: "3".to_string(),
            name: "Gunbarrel 25".to_string(),
            description: Some("25 laps on gunbarrel today".to_string()),
            category: PhotoCategory::Landscape,
            github_user: Some("sSchmidt".to_string()),
            created: Timestamp::raw("2018-04-15T19:09:57.308Z"),
        },
    ];

    let tags = vec![
        Tag::new("1", "gPlake"),
        Tag::new("2", "sSchmidt"),
        Tag::new("2", "mHattrup"),
        Tag::new("2", "gPlake"),
    ];

    SeedData { users, photos, tags }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_seed_has_expected_shape() {
        let seed = default_seed();
        assert_eq!(seed.users.len(), 3);
        assert_eq!(seed.photos.len(), 3);
        assert_eq!(seed.tags.len(), 4);
    }

    #[test]
    fn loads_seed_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
users:
  - githubLogin: ace
    name: Ace Ventura
photos:
  - id: "10"
    name: Lift line
    category: GRAPHIC
    githubUser: ace
    created: "2020-01-01"
tags:
  - photoID: "10"
    userID: ace
"#
        )
        .unwrap();

        let seed = SeedData::from_yaml_file(file.path()).unwrap();
        assert_eq!(seed.users[0].github_login, "ace");
        assert_eq!(seed.photos[0].category, PhotoCategory::Graphic);
        assert_eq!(seed.tags[0], Tag::new("10", "ace"));
    }

    #[test]
    fn missing_seed_file_is_io_error() {
        let err = SeedData::from_yaml_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
