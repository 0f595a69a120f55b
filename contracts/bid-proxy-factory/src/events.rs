use commons::{AllowanceRoot, NEW_ALLOWANCE_REGISTRY_TAG, NEW_BID_PROXY_TAG};
use concordium_std::*;

/// New bid proxy announcement.
#[derive(Debug, Serial)]
pub struct NewBidProxyEvent<'a> {
    /// Address of the freshly configured agent.
    pub bid_proxy: &'a ContractAddress,
}

/// New allowance registry announcement.
#[derive(Debug, Serial)]
pub struct NewAllowanceRegistryEvent<'a> {
    /// Address of the freshly configured registry.
    pub registry: &'a ContractAddress,
    /// Root committed into it.
    pub root: &'a AllowanceRoot,
}

/// Tagged custom event to be serialized for the event log. These
/// announcements are the only discovery mechanism for configured clones;
/// the factory keeps no index.
#[derive(Debug)]
pub enum FactoryEvent<'a> {
    NewBidProxy(NewBidProxyEvent<'a>),
    NewAllowanceRegistry(NewAllowanceRegistryEvent<'a>),
}

impl<'a> FactoryEvent<'a> {
    pub fn new_bid_proxy(bid_proxy: &'a ContractAddress) -> Self {
        Self::NewBidProxy(NewBidProxyEvent { bid_proxy })
    }

    pub fn new_allowance_registry(
        registry: &'a ContractAddress,
        root: &'a AllowanceRoot,
    ) -> Self {
        Self::NewAllowanceRegistry(NewAllowanceRegistryEvent { registry, root })
    }
}

impl<'a> Serial for FactoryEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            FactoryEvent::NewBidProxy(event) => {
                out.write_u8(NEW_BID_PROXY_TAG)?;
                event.serial(out)
            }
            FactoryEvent::NewAllowanceRegistry(event) => {
                out.write_u8(NEW_ALLOWANCE_REGISTRY_TAG)?;
                event.serial(out)
            }
        }
    }
}
