use kube::CustomResourceExt;

use cluster_registrar::api::registry_entry::ClusterRegistryEntry;
use cluster_registrar::api::remote_cluster::RemoteCluster;

fn main() {
    print!(
        "{}",
        serde_yaml::to_string(&ClusterRegistryEntry::crd()).unwrap()
    );
    println!("---");
    print!("{}", serde_yaml::to_string(&RemoteCluster::crd()).unwrap());
}
