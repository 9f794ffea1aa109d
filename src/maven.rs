pub mod coordinates;
pub mod local_repo;
pub mod maven_repo_metadata;
pub mod metadata_xml;
pub mod notation;
pub mod paths;
