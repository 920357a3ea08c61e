mod common;

use common::{swap_data, RouteSetup, TestEnv, START_TIME};
use delegate_common::{
    crypto::KeyPair,
    transaction::{TransactionError, MAX_INSTRUCTION_DATA_SIZE},
};
use delegate_program::{
    event::RouteEvent,
    instruction::{self, Aggregator, RouteParams},
    state::find_vault_address,
    token::get_associated_token_address,
    runtime::RuntimeError,
    DelegateError, DISCRIMINATOR_OKX_SWAP, JUPITER_PROGRAM_ID,
};

#[test]
fn test_route_forwards_output_delta() {
    let mut env = TestEnv::initialized(60);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();
    let vault = find_vault_address().0;

    let result = env
        .operator_send(setup.route(&operator, 100, swap_data(100, 250, 0)))
        .unwrap();

    assert_eq!(env.balance(&setup.receiver_account()), 250);
    let delegator_account = env.token_account(&setup.delegator_account()).unwrap();
    assert_eq!(delegator_account.amount, 900);
    assert_eq!(delegator_account.delegated_amount, 400);
    assert_eq!(delegator_account.delegate, Some(vault));

    // nothing stays in the vault
    assert_eq!(
        env.balance(&get_associated_token_address(&vault, &setup.input_mint)),
        0
    );
    assert_eq!(
        env.balance(&get_associated_token_address(&vault, &setup.output_mint)),
        0
    );
    assert_eq!(env.balance(&setup.pool.input_account), 100);
    assert_eq!(env.balance(&setup.pool.output_account), 9_750);
    assert_eq!(env.config().last_trade_timestamp, START_TIME);

    let events = result.events::<RouteEvent>();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].aggregator, "jupiter");
    assert_eq!(events[0].in_amount, 100);
    assert_eq!(events[0].out_amount, 250);
    assert_eq!(events[0].receiver, setup.receiver.public_key());
}

#[test]
fn test_route_only_forwards_new_output() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();
    let vault = find_vault_address().0;
    // pre-existing vault output balance must stay in the vault
    env.fund(&vault, &setup.output_mint, 40);

    env.operator_send(setup.route(&operator, 50, swap_data(50, 70, 0)))
        .unwrap();

    assert_eq!(env.balance(&setup.receiver_account()), 70);
    assert_eq!(
        env.balance(&get_associated_token_address(&vault, &setup.output_mint)),
        40
    );
}

#[test]
fn test_route_enforces_cooldown() {
    let mut env = TestEnv::initialized(30);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();

    env.operator_send(setup.route(&operator, 10, swap_data(10, 10, 0)))
        .unwrap();
    env.clock.advance(30);
    let err = env
        .operator_send(setup.route(&operator, 10, swap_data(10, 10, 0)))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::SwapTooFrequent));

    env.clock.advance(1);
    env.operator_send(setup.route(&operator, 10, swap_data(10, 10, 0)))
        .unwrap();
    assert_eq!(env.balance(&setup.receiver_account()), 20);
}

#[test]
fn test_route_fails_when_vault_output_decreases() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();
    let vault = find_vault_address().0;
    env.fund(&vault, &setup.output_mint, 100);

    let err = env
        .operator_send(setup.route(&operator, 10, swap_data(10, 5, 50)))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::SwapFailed));

    // nothing moved
    assert_eq!(env.balance(&setup.delegator_account()), 1_000);
    assert_eq!(env.balance(&setup.pool.output_account), 10_000);
    assert_eq!(env.config().last_trade_timestamp, 0);
}

#[test]
fn test_route_requires_receiver_access() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();
    let admin = env.admin.public_key();
    env.admin_send(instruction::revoke_access(
        &admin,
        &setup.receiver.public_key(),
    ))
    .unwrap();

    let err = env
        .operator_send(setup.route(&operator, 10, swap_data(10, 10, 0)))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::AccessNotGranted));
}

#[test]
fn test_route_requires_receiver_account_in_remaining() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();

    let mut remaining = setup.remaining();
    remaining.pop();
    let ix = instruction::route(
        &setup.accounts(&operator),
        RouteParams {
            aggregator: Aggregator::Jupiter,
            in_amount: 10,
            data: swap_data(10, 10, 0),
        },
        remaining,
    );
    let err = env.operator_send(ix).unwrap_err();
    assert_eq!(
        err.delegate_error(),
        Some(DelegateError::ReceiverTokenAccountNotFound)
    );
}

#[test]
fn test_route_rejects_unlisted_discriminator() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();

    let mut data = swap_data(10, 10, 0);
    data[..8].copy_from_slice(&DISCRIMINATOR_OKX_SWAP);
    let err = env
        .operator_send(setup.route(&operator, 10, data))
        .unwrap_err();
    assert_eq!(
        err.delegate_error(),
        Some(DelegateError::InvalidInstructionDiscriminator)
    );
}

#[test]
fn test_route_rejects_program_mismatch() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();

    let mut data = swap_data(10, 10, 0);
    data[..8].copy_from_slice(&DISCRIMINATOR_OKX_SWAP);
    let mut ix = instruction::route(
        &setup.accounts(&operator),
        RouteParams {
            aggregator: Aggregator::Okx,
            in_amount: 10,
            data,
        },
        setup.remaining(),
    );
    ix.accounts[12].pubkey = *JUPITER_PROGRAM_ID;

    let err = env.operator_send(ix).unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::InvalidProgramId));
}

#[test]
fn test_route_delegation_checks() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();

    let err = env
        .operator_send(setup.route(&operator, 501, swap_data(501, 10, 0)))
        .unwrap_err();
    assert_eq!(
        err.delegate_error(),
        Some(DelegateError::InsufficientDelegatedAmount)
    );

    let err = env
        .operator_send(setup.route(&operator, 0, swap_data(0, 10, 0)))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::SwapAmountTooSmall));

    // a delegator that never approved the vault
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    env.send(
        vec![delegate_program::token::instruction::revoke(
            &setup.delegator_account(),
            &setup.delegator.public_key(),
        )],
        &[&setup.delegator],
    )
    .unwrap();
    let err = env
        .operator_send(setup.route(&operator, 10, swap_data(10, 10, 0)))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::DelegateNotApproved));
}

#[test]
fn test_route_rejected_when_paused_or_not_operator() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let admin = env.admin.public_key();
    let operator = env.operator.public_key();
    let stranger = KeyPair::new();

    let err = env
        .send(
            vec![setup.route(&stranger.public_key(), 10, swap_data(10, 10, 0))],
            &[&stranger],
        )
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::InvalidOperator));

    env.admin_send(instruction::pause(&admin, true)).unwrap();
    let err = env
        .operator_send(setup.route(&operator, 10, swap_data(10, 10, 0)))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::ConfigPaused));
}

#[test]
fn test_route_data_larger_than_instruction_limit_is_rejected() {
    let mut env = TestEnv::initialized(0);
    let setup = RouteSetup::new(&mut env);
    let operator = env.operator.public_key();

    let mut data = swap_data(10, 10, 0);
    data.resize(MAX_INSTRUCTION_DATA_SIZE + 1, 0);
    let ix = setup.route(&operator, 10, data);
    assert!(ix.data.len() > MAX_INSTRUCTION_DATA_SIZE);

    let err = env.operator_send(ix).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Transaction(TransactionError::InstructionDataTooLarge { index: 0, .. })
    ));
    assert_eq!(env.balance(&setup.receiver_account()), 0);
}
