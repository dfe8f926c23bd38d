//! MITM relay locations offered to the user
//!
//! Display data only; no relay connection is made from this crate.

/// A named relay location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MitmServer {
    /// Identifier stored in `netplay.mitm_server`
    pub id: &'static str,
    /// Label shown in menus
    pub label: &'static str,
}

/// Known relay locations, in menu order
pub const MITM_SERVERS: [MitmServer; 5] = [
    MitmServer {
        id: "nyc",
        label: "New York",
    },
    MitmServer {
        id: "madrid",
        label: "Madrid",
    },
    MitmServer {
        id: "saopaulo",
        label: "Sao Paulo",
    },
    MitmServer {
        id: "singapore",
        label: "Singapore",
    },
    MitmServer {
        id: "custom",
        label: "Custom",
    },
];

/// Look up a relay location by id
pub fn find_mitm_server(id: &str) -> Option<&'static MitmServer> {
    MITM_SERVERS.iter().find(|server| server.id == id)
}
