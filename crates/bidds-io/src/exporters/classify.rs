//! Maps a component to the network-document bucket it is written to.

use bidds_core::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkBucket {
    Bus,
    DispatchableDevice,
    RegionalReserve,
    /// Lines also emit two records into the `shunt` bucket
    AcLine,
    TwoWindingTransformer,
    DcLine,
}

impl NetworkBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkBucket::Bus => "bus",
            NetworkBucket::DispatchableDevice => "dispatchable_device",
            NetworkBucket::RegionalReserve => "regional_reserve",
            NetworkBucket::AcLine => "ac_line",
            NetworkBucket::TwoWindingTransformer => "two_winding_transformer",
            NetworkBucket::DcLine => "dc_line",
        }
    }
}

impl std::fmt::Display for NetworkBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket of a component, or `None` when no encoder handles its category.
pub fn classify(component: &Component) -> Option<NetworkBucket> {
    match component {
        Component::Bus(_) => Some(NetworkBucket::Bus),
        Component::Generator(_) | Component::Load(_) | Component::Battery(_) => {
            Some(NetworkBucket::DispatchableDevice)
        }
        Component::Reserve(_) => Some(NetworkBucket::RegionalReserve),
        Component::Line(_) => Some(NetworkBucket::AcLine),
        Component::TapTransformer(_) => Some(NetworkBucket::TwoWindingTransformer),
        Component::DcLine(_) => Some(NetworkBucket::DcLine),
        Component::Unsupported(_) => None,
    }
}
