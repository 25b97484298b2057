//! Common document shapes of the vTM REST API

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Body of every configuration object: `{"properties": {<section>: {...}}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument<T> {
    pub properties: T,
}

/// Body of every statistics object: `{"statistics": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsDocument<T> {
    pub statistics: T,
}

/// Body of a collection listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildList {
    #[serde(default)]
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Child {
    pub name: String,
}

impl ChildList {
    pub fn names(self) -> Vec<String> {
        self.children.into_iter().map(|c| c.name).collect()
    }
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error_id: String,
    #[serde(default)]
    pub error_text: String,
}

/// A configuration object type living under `/config/active/<COLLECTION>`
pub trait ConfigObject: Serialize + DeserializeOwned + Default + Send + Sync {
    const COLLECTION: &'static str;

    /// Singletons are addressed by the collection path alone
    const SINGLETON: bool = false;
}

/// A statistics node under `/status/local_tm/statistics/<COLLECTION>`
pub trait StatisticsObject: DeserializeOwned + Send {
    const COLLECTION: &'static str;
}
