//! Client for the CKAN datastore action API (`/api/3/action/<action>`).

pub mod client;
pub mod response;
