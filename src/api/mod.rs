pub mod registry_entry;
pub mod remote_cluster;
