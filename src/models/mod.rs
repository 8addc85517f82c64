//! Typed FortiOS CMDB objects.

mod address;
mod policy;
mod profile_group;
mod radius;
mod service;
mod table;
mod vip;
mod wids;

pub use address::*;
pub use policy::*;
pub use profile_group::*;
pub use radius::*;
pub use service::*;
pub use table::*;
pub use vip::*;
pub use wids::*;

use crate::endpoint::Endpoint;
use crate::path::EndpointPath;
use crate::traits::CmdbObject;

/// Endpoints of every object type modelled by this crate.
pub fn known_endpoints() -> Vec<Endpoint> {
    vec![
        Address::endpoint(),
        AddressGroup::endpoint(),
        Policy::endpoint(),
        Vip::endpoint(),
        ProfileGroup::endpoint(),
        RadiusServer::endpoint(),
        WidsProfile::endpoint(),
        ServiceCustom::endpoint(),
    ]
}

/// Endpoint for `path`, using the modelled primary key and table fields
/// when the type is known and `name` otherwise.
pub fn endpoint_for(path: &EndpointPath) -> Endpoint {
    known_endpoints()
        .into_iter()
        .find(|e| e.path() == path)
        .unwrap_or_else(|| Endpoint::new(path.clone(), "name"))
}
