use mongodb::{Collection, Database};

use crate::{
    constants::{CONTACTS_COLLECTION, PROJECTS_COLLECTION},
    repositories::{contact::ContactDocument, project::ProjectDocument},
};

#[derive(Clone)]
pub struct MongoProjectRepo {
    pub database: Database,
    pub collection: Collection<ProjectDocument>,
}

impl MongoProjectRepo {
    pub fn new(database: &Database) -> Self {
        MongoProjectRepo {
            database: database.clone(),
            collection: database.collection(PROJECTS_COLLECTION),
        }
    }
}

#[derive(Clone)]
pub struct MongoContactRepo {
    pub collection: Collection<ContactDocument>,
}

impl MongoContactRepo {
    pub fn new(database: &Database) -> Self {
        MongoContactRepo {
            collection: database.collection(CONTACTS_COLLECTION),
        }
    }
}
