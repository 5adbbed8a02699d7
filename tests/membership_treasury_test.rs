// Contract-level checks for the membership treasury.
//
// These tests pin the contract object and the authorization gate every
// mutator goes through. Endpoint flows run in
// membership_treasury_whitebox_test.rs.

use membership_treasury::dispatch::{
    authorize_administrator, authorize_proposal, Authority, Capability,
};
use membership_treasury::errors::*;
use membership_treasury::types::GovernanceAction;
use multiversx_sc::types::{BigUint, EgldOrEsdtTokenIdentifier, ManagedAddress, ManagedBuffer};
use multiversx_sc_scenario::api::{DebugApi, StaticApi};

type TreasuryContract = membership_treasury::ContractObj<DebugApi>;

fn address(byte: u8) -> ManagedAddress<StaticApi> {
    ManagedAddress::from(&[byte; 32])
}

fn admin_capability() -> Capability {
    let admin = address(9);
    authorize_administrator(&admin, &admin, true).unwrap()
}

#[test]
fn test_contract_builds() {
    let _: fn() -> TreasuryContract = membership_treasury::contract_obj;
}

#[test]
fn test_proposal_gate() {
    let capability = authorize_proposal(false, 7).unwrap();
    assert!(capability.is_governance());
    assert_eq!(capability.authority(), Authority::Governance { proposal_id: 7 });

    assert_eq!(authorize_proposal(true, 7), Err(ERR_DELEGATED_MODE_ACTIVE));
}

#[test]
fn test_administrator_gate() {
    let admin = address(9);
    let stranger = address(3);

    assert_eq!(
        authorize_administrator(&stranger, &admin, true),
        Err(ERR_NOT_ADMINISTRATOR)
    );
    assert_eq!(
        authorize_administrator(&admin, &admin, false),
        Err(ERR_DELEGATED_MODE_OFF)
    );

    let capability = authorize_administrator(&admin, &admin, true).unwrap();
    assert!(!capability.is_governance());
    assert_eq!(capability.authority(), Authority::Administrator);
}

#[test]
fn test_administrator_cannot_entrench_itself() {
    let capability = admin_capability();

    let replace_admin = GovernanceAction::<StaticApi>::SetAdministrator {
        administrator: address(4),
    };
    let enable = GovernanceAction::<StaticApi>::SetDelegatedMode { enabled: true };
    let disable = GovernanceAction::<StaticApi>::SetDelegatedMode { enabled: false };

    assert!(!capability.permits(&replace_admin));
    assert!(!capability.permits(&enable));
    assert!(capability.permits(&disable));
}

#[test]
fn test_governance_permits_every_action() {
    let capability = authorize_proposal(false, 1).unwrap();

    let actions = [
        GovernanceAction::<StaticApi>::SetAdministrator {
            administrator: address(4),
        },
        GovernanceAction::SetDelegatedMode { enabled: true },
        GovernanceAction::Withdraw {
            asset: EgldOrEsdtTokenIdentifier::egld(),
            recipient: address(5),
            amount: BigUint::from(10u64),
        },
        GovernanceAction::SetMetadata {
            metadata: ManagedBuffer::from("ipfs://charter"),
        },
    ];
    for action in actions.iter() {
        assert!(capability.permits(action));
    }
}

#[test]
fn test_administrator_runs_ordinary_actions() {
    let capability = admin_capability();

    let withdraw = GovernanceAction::<StaticApi>::Withdraw {
        asset: EgldOrEsdtTokenIdentifier::egld(),
        recipient: address(5),
        amount: BigUint::from(10u64),
    };
    let pause = GovernanceAction::<StaticApi>::SetJoinPaused { paused: true };

    assert!(capability.permits(&withdraw));
    assert!(capability.permits(&pause));
}
