use commons::{
    AgentConfig, AssetAmount, ContractTokenAmount, ContractTokenId, TokenAsset,
    CCD_BID_CLAIMED_TAG, CCD_RECOVERED_TAG, CONFIG_UPDATED_TAG, NFT_FORWARDED_TAG,
    PROXY_BID_CCD_TAG, PROXY_BID_TOKEN_TAG, REGISTRY_UPDATED_TAG, TOKENS_RECOVERED_TAG,
    TOKEN_BID_CLAIMED_TAG,
};
use concordium_std::*;

/// Successful proxy bid event data.
#[derive(Debug, Serial)]
pub struct ProxyBidEvent<'a> {
    /// Account whose allowance authorized the raise.
    pub account: &'a AccountAddress,
    /// New total bid of this agent in the bound auction.
    pub bid: AssetAmount,
}

/// Registry rebind event data.
#[derive(Debug, Serial)]
pub struct RegistryUpdatedEvent<'a> {
    /// Allowance registry the agent trusts from now on.
    pub registry: &'a ContractAddress,
}

/// Full configuration update event data.
#[derive(Debug, Serial)]
pub struct ConfigUpdatedEvent<'a> {
    pub config: &'a AgentConfig,
}

/// Claim-and-withdraw event data.
#[derive(Debug, Serial)]
pub struct BidClaimedEvent {
    /// Escrow amount pulled back from the auction.
    pub amount: AssetAmount,
}

/// CCD recovery event data.
#[derive(Debug, Serial)]
pub struct CcdRecoveredEvent<'a> {
    pub recipient: &'a AccountAddress,
    pub amount: Amount,
}

/// Token recovery event data.
#[derive(Debug, Serial)]
pub struct TokensRecoveredEvent<'a> {
    pub token: &'a TokenAsset,
    pub recipient: &'a AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Won NFT forwarding event data.
#[derive(Debug, Serial)]
pub struct NftForwardedEvent<'a> {
    pub collection: &'a ContractAddress,
    pub item_id: &'a ContractTokenId,
    pub recipient: &'a AccountAddress,
}

/// Tagged custom event to be serialized for the event log.
///
/// CCD and token variants carry distinct tags on purpose: downstream
/// accounting of the two asset kinds differs.
#[derive(Debug)]
pub enum ProxyEvent<'a> {
    ProxyBidCcd(ProxyBidEvent<'a>),
    ProxyBidToken(ProxyBidEvent<'a>),
    RegistryUpdated(RegistryUpdatedEvent<'a>),
    ConfigUpdated(ConfigUpdatedEvent<'a>),
    CcdBidClaimed(BidClaimedEvent),
    TokenBidClaimed(BidClaimedEvent),
    CcdRecovered(CcdRecoveredEvent<'a>),
    TokensRecovered(TokensRecoveredEvent<'a>),
    NftForwarded(NftForwardedEvent<'a>),
}

impl<'a> ProxyEvent<'a> {
    pub fn proxy_bid_ccd(account: &'a AccountAddress, bid: AssetAmount) -> Self {
        Self::ProxyBidCcd(ProxyBidEvent { account, bid })
    }

    pub fn proxy_bid_token(account: &'a AccountAddress, bid: AssetAmount) -> Self {
        Self::ProxyBidToken(ProxyBidEvent { account, bid })
    }

    pub fn registry_updated(registry: &'a ContractAddress) -> Self {
        Self::RegistryUpdated(RegistryUpdatedEvent { registry })
    }

    pub fn config_updated(config: &'a AgentConfig) -> Self {
        Self::ConfigUpdated(ConfigUpdatedEvent { config })
    }

    pub fn ccd_bid_claimed(amount: AssetAmount) -> Self {
        Self::CcdBidClaimed(BidClaimedEvent { amount })
    }

    pub fn token_bid_claimed(amount: AssetAmount) -> Self {
        Self::TokenBidClaimed(BidClaimedEvent { amount })
    }

    pub fn ccd_recovered(recipient: &'a AccountAddress, amount: Amount) -> Self {
        Self::CcdRecovered(CcdRecoveredEvent { recipient, amount })
    }

    pub fn tokens_recovered(
        token: &'a TokenAsset,
        recipient: &'a AccountAddress,
        amount: ContractTokenAmount,
    ) -> Self {
        Self::TokensRecovered(TokensRecoveredEvent {
            token,
            recipient,
            amount,
        })
    }

    pub fn nft_forwarded(
        collection: &'a ContractAddress,
        item_id: &'a ContractTokenId,
        recipient: &'a AccountAddress,
    ) -> Self {
        Self::NftForwarded(NftForwardedEvent {
            collection,
            item_id,
            recipient,
        })
    }
}

impl<'a> Serial for ProxyEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            ProxyEvent::ProxyBidCcd(event) => {
                out.write_u8(PROXY_BID_CCD_TAG)?;
                event.serial(out)
            }
            ProxyEvent::ProxyBidToken(event) => {
                out.write_u8(PROXY_BID_TOKEN_TAG)?;
                event.serial(out)
            }
            ProxyEvent::RegistryUpdated(event) => {
                out.write_u8(REGISTRY_UPDATED_TAG)?;
                event.serial(out)
            }
            ProxyEvent::ConfigUpdated(event) => {
                out.write_u8(CONFIG_UPDATED_TAG)?;
                event.serial(out)
            }
            ProxyEvent::CcdBidClaimed(event) => {
                out.write_u8(CCD_BID_CLAIMED_TAG)?;
                event.serial(out)
            }
            ProxyEvent::TokenBidClaimed(event) => {
                out.write_u8(TOKEN_BID_CLAIMED_TAG)?;
                event.serial(out)
            }
            ProxyEvent::CcdRecovered(event) => {
                out.write_u8(CCD_RECOVERED_TAG)?;
                event.serial(out)
            }
            ProxyEvent::TokensRecovered(event) => {
                out.write_u8(TOKENS_RECOVERED_TAG)?;
                event.serial(out)
            }
            ProxyEvent::NftForwarded(event) => {
                out.write_u8(NFT_FORWARDED_TAG)?;
                event.serial(out)
            }
        }
    }
}
