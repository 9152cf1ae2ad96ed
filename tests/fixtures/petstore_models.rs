//! Models of the pet store service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/* go-swagify
@@struct: Pet
description: A pet in the store
*/
#[derive(Debug, Serialize, Deserialize)]
pub struct Pet {
    pub pet_id: u64,
    pub name: String,
    pub tag: Option<String>,
    #[serde(rename = "ownerRef")]
    pub owner: Option<Uuid>,
    pub photo_urls: Vec<String>,
    #[serde(skip)]
    pub cache_key: String,
    internal_note: String,
}

/* go-swagify
@@struct: NewPet
*/
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: String,
    pub photo_urls: Vec<String>,
    pub tag: Option<String>,
}

/* go-swagify
@@struct: PetPage
*/
#[derive(Debug, Serialize)]
pub struct PetPage {
    pub items: Vec<Pet>,
    pub next_cursor: Option<String>,
}

/* go-swagify
@@schema: PetPage
description: Cursor based page
properties.items.description: Pets on this page
*/
