//! Records returned by the catalog API

use serde::{Deserialize, Deserializer, Serialize};

/// One ranked entry of a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarArtwork {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filepath: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub pattern_image_url: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub artist_birth_year: Option<i32>,
    #[serde(default)]
    pub artist_death_year: Option<i32>,
    #[serde(default)]
    pub distance: Option<f64>,
    // the API spells it "dicrete"
    #[serde(default, rename = "dicrete_distance_level", alias = "discrete_distance_level")]
    pub discrete_distance_level: Option<f64>,
    #[serde(default)]
    pub proportional_distance: Option<f64>,
    #[serde(default)]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub percentage_similarity: Option<f64>,
}

/// A catalog artwork
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filepath: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub pattern_image_url: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub artist_birth_year: Option<i32>,
    #[serde(default)]
    pub artist_death_year: Option<i32>,
}

/// A catalog artist; columns the client does not know are kept in `extra`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Fields of a new artwork
#[derive(Debug, Clone)]
pub struct NewArtwork {
    pub title: String,
    pub artist_id: String,
    pub image: Vec<u8>,
    pub file_name: String,
}

/// 1-based rank of `artwork_id` in a ranked list
pub fn rank_of(results: &[SimilarArtwork], artwork_id: &str) -> Option<usize> {
    let artwork_id = artwork_id.trim();
    results
        .iter()
        .position(|artwork| artwork.id == artwork_id)
        .map(|index| index + 1)
}

// Ids come back as integers from the API but as text from the ground truth
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.trim().to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
