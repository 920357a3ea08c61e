mod common;

use common::{clone_keypair, TestEnv, START_TIME};
use delegate_common::crypto::{KeyPair, PublicKey};
use delegate_program::{
    instruction,
    runtime::ProgramError,
    state::find_vault_address,
    token::{self, get_associated_token_address, TokenError},
    DelegateError,
};

#[test]
fn test_transfer_in_signed_by_owner() {
    let mut env = TestEnv::initialized(60);
    let user = KeyPair::new();
    let mint = env.create_mint(6);
    let from = env.fund(&user.public_key(), &mint, 1_000);
    let vault = find_vault_address().0;
    let vault_account = get_associated_token_address(&vault, &mint);
    assert!(env.token_account(&vault_account).is_none());

    let operator = clone_keypair(&env.operator);
    env.send(
        vec![instruction::transfer_in(
            &operator.public_key(),
            &user.public_key(),
            true,
            &mint,
            &from,
            400,
        )],
        &[&operator, &user],
    )
    .unwrap();

    assert_eq!(env.balance(&from), 600);
    let vault_token_account = env.token_account(&vault_account).unwrap();
    assert_eq!(vault_token_account.owner, vault);
    assert_eq!(vault_token_account.amount, 400);
    // transfer_in is not rate limited
    assert_eq!(env.config().last_trade_timestamp, 0);
}

#[test]
fn test_transfer_in_owner_must_sign() {
    let mut env = TestEnv::initialized(60);
    let user = KeyPair::new();
    let mint = env.create_mint(6);
    let from = env.fund(&user.public_key(), &mint, 1_000);
    let operator = env.operator.public_key();

    let err = env
        .operator_send(instruction::transfer_in(
            &operator,
            &user.public_key(),
            false,
            &mint,
            &from,
            400,
        ))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::InvalidTokenAccount));
    assert_eq!(env.balance(&from), 1_000);
}

#[test]
fn test_transfer_in_owner_balance_checked() {
    let mut env = TestEnv::initialized(60);
    let user = KeyPair::new();
    let mint = env.create_mint(6);
    let from = env.fund(&user.public_key(), &mint, 100);
    let operator = clone_keypair(&env.operator);

    let err = env
        .send(
            vec![instruction::transfer_in(
                &operator.public_key(),
                &user.public_key(),
                true,
                &mint,
                &from,
                101,
            )],
            &[&operator, &user],
        )
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::InsufficientFunds));
}

#[test]
fn test_transfer_in_through_delegation() {
    let mut env = TestEnv::initialized(60);
    let user = KeyPair::new();
    let mint = env.create_mint(6);
    let from = env.fund(&user.public_key(), &mint, 1_000);
    let vault = find_vault_address().0;
    let operator = env.operator.public_key();

    // not delegated yet
    let err = env
        .operator_send(instruction::transfer_in(
            &operator, &vault, false, &mint, &from, 100,
        ))
        .unwrap_err();
    assert_eq!(
        err.delegate_error(),
        Some(DelegateError::InvalidDelegateTokenAccount)
    );

    env.approve_vault(&user, &mint, 300);

    let err = env
        .operator_send(instruction::transfer_in(
            &operator, &vault, false, &mint, &from, 301,
        ))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::InsufficientFunds));

    env.operator_send(instruction::transfer_in(
        &operator, &vault, false, &mint, &from, 300,
    ))
    .unwrap();

    let source = env.token_account(&from).unwrap();
    assert_eq!(source.amount, 700);
    assert_eq!(source.delegated_amount, 0);
    assert_eq!(source.delegate, None);
    assert_eq!(
        env.balance(&get_associated_token_address(&vault, &mint)),
        300
    );
}

#[test]
fn test_transfer_in_rejects_zero_amount() {
    let mut env = TestEnv::initialized(60);
    let user = KeyPair::new();
    let mint = env.create_mint(6);
    let from = env.fund(&user.public_key(), &mint, 1_000);
    let operator = env.operator.public_key();

    let err = env
        .operator_send(instruction::transfer_in(
            &operator,
            &find_vault_address().0,
            false,
            &mint,
            &from,
            0,
        ))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::SwapAmountTooSmall));
}

/// Env whose vault holds 1000 tokens of a fresh mint
fn funded_vault(cooldown: i64) -> (TestEnv, PublicKey) {
    let mut env = TestEnv::initialized(cooldown);
    let mint = env.create_mint(6);
    let vault = find_vault_address().0;
    env.fund(&vault, &mint, 1_000);
    (env, mint)
}

#[test]
fn test_transfer_out_enforces_cooldown() {
    let (mut env, mint) = funded_vault(60);
    let operator = env.operator.public_key();
    let receiver = KeyPair::new().public_key();
    let destination = env.fund(&receiver, &mint, 0);

    env.operator_send(instruction::transfer_out(&operator, &mint, &destination, 100))
        .unwrap();
    assert_eq!(env.balance(&destination), 100);
    assert_eq!(env.config().last_trade_timestamp, START_TIME);

    // same second
    let err = env
        .operator_send(instruction::transfer_out(&operator, &mint, &destination, 100))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::SwapTooFrequent));

    // last + cooldown == now is still too early
    env.clock.advance(60);
    let err = env
        .operator_send(instruction::transfer_out(&operator, &mint, &destination, 100))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::SwapTooFrequent));
    assert_eq!(env.config().last_trade_timestamp, START_TIME);

    env.clock.advance(1);
    env.operator_send(instruction::transfer_out(&operator, &mint, &destination, 100))
        .unwrap();
    assert_eq!(env.balance(&destination), 200);
    assert_eq!(env.config().last_trade_timestamp, START_TIME + 61);
}

#[test]
fn test_transfer_out_by_admin_is_allowed() {
    let (mut env, mint) = funded_vault(0);
    let admin = env.admin.public_key();
    let destination = env.fund(&admin, &mint, 0);

    env.admin_send(instruction::transfer_out(&admin, &mint, &destination, 1_000))
        .unwrap();
    assert_eq!(env.balance(&destination), 1_000);
}

#[test]
fn test_transfer_out_errors() {
    let (mut env, mint) = funded_vault(0);
    let operator = env.operator.public_key();
    let admin = env.admin.public_key();
    let destination = env.fund(&operator, &mint, 0);
    let stranger = KeyPair::new();

    let err = env
        .send(
            vec![instruction::transfer_out(
                &stranger.public_key(),
                &mint,
                &destination,
                1,
            )],
            &[&stranger],
        )
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::InvalidOperator));

    let err = env
        .operator_send(instruction::transfer_out(&operator, &mint, &destination, 0))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::SwapAmountTooSmall));

    let err = env
        .operator_send(instruction::transfer_out(
            &operator,
            &mint,
            &destination,
            1_001,
        ))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::InsufficientFunds));

    env.admin_send(instruction::pause(&admin, true)).unwrap();
    let err = env
        .operator_send(instruction::transfer_out(&operator, &mint, &destination, 1))
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::ConfigPaused));
    assert_eq!(env.balance(&destination), 0);
}

#[test]
fn test_transfer_out_destination_mint_must_match() {
    let (mut env, mint) = funded_vault(0);
    let operator = env.operator.public_key();
    let other_mint = env.create_mint(6);
    let destination = env.fund(&operator, &other_mint, 0);

    let err = env
        .operator_send(instruction::transfer_out(&operator, &mint, &destination, 1))
        .unwrap_err();
    assert_eq!(err.token_error(), Some(&TokenError::MintMismatch(mint)));
    // the cooldown was not consumed by the failed transfer
    assert_eq!(env.config().last_trade_timestamp, 0);
}

#[test]
fn test_token_receive_moves_whole_balance() {
    let mut env = TestEnv::initialized(60);
    let mint = env.create_mint(9);
    let executor = KeyPair::new();
    let receiver = KeyPair::new().public_key();
    let executor_account = env.fund(&executor.public_key(), &mint, 777);
    env.grant(&receiver);

    env.send(
        vec![instruction::token_receive(
            &executor.public_key(),
            &receiver,
            &mint,
        )],
        &[&executor],
    )
    .unwrap();

    assert_eq!(env.balance(&executor_account), 0);
    assert_eq!(
        env.balance(&get_associated_token_address(&receiver, &mint)),
        777
    );
}

#[test]
fn test_token_receive_errors() {
    let mut env = TestEnv::initialized(60);
    let mint = env.create_mint(9);
    let executor = KeyPair::new();
    let receiver = KeyPair::new().public_key();
    env.fund(&executor.public_key(), &mint, 0);

    let err = env
        .send(
            vec![instruction::token_receive(
                &executor.public_key(),
                &receiver,
                &mint,
            )],
            &[&executor],
        )
        .unwrap_err();
    assert_eq!(err.delegate_error(), Some(DelegateError::AccessNotGranted));

    env.grant(&receiver);
    let err = env
        .send(
            vec![instruction::token_receive(
                &executor.public_key(),
                &receiver,
                &mint,
            )],
            &[&executor],
        )
        .unwrap_err();
    assert_eq!(
        err.delegate_error(),
        Some(DelegateError::ExecutorOutputTokenAccountIsInsufficient)
    );

    let mut ix = instruction::token_receive(&executor.public_key(), &receiver, &mint);
    ix.accounts[3].pubkey = get_associated_token_address(&executor.public_key(), &mint);
    env.admin_send(token::instruction::mint_to(
        &mint,
        &ix.accounts[2].pubkey,
        &env.admin.public_key(),
        5,
    ))
    .unwrap();
    let err = env.send(vec![ix], &[&executor]).unwrap_err();
    assert_eq!(
        err.delegate_error(),
        Some(DelegateError::FundVaultOutputTokenAccountNotFound)
    );
}

#[test]
fn test_vault_cannot_be_spent_without_program() {
    let (mut env, mint) = funded_vault(0);
    let vault = find_vault_address().0;
    let vault_account = get_associated_token_address(&vault, &mint);
    let thief = KeyPair::new();
    let destination = env.fund(&thief.public_key(), &mint, 0);

    // nobody holds the vault key, a direct transfer cannot be signed for it
    let ix = token::instruction::transfer_checked(
        &vault_account,
        &mint,
        &destination,
        &thief.public_key(),
        10,
        6,
    );
    let err = env.send(vec![ix], &[&thief]).unwrap_err();
    assert_eq!(
        err.token_error(),
        Some(&TokenError::OwnerMismatch(thief.public_key()))
    );
    assert!(matches!(
        err.program_error(),
        Some(ProgramError::Token(_))
    ));
    assert_eq!(env.balance(&vault_account), 1_000);
}
