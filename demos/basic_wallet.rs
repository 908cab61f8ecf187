//! Basic wallet usage example

use multisig_wallet::utils::{EnhancedTransferValidator, MemoryStorage};
use multisig_wallet::{Address, Wallet, WalletConfig, WalletError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multisig_wallet=debug".parse()?),
        )
        .with_target(true)
        .init();

    println!("🔐 Multisig Wallet - Basic Example\n");

    let alice = Address::new("0x5B38Da6a701c568545dCfcB03FcB875f56beddC4");
    let bob = Address::new("0xAb8483F64d9C6d1EcF9b849Ae677dD3315835cb2");
    let carol = Address::new("0x4B20993Bc481177ec7E8f571ceCaE8A9e22C02db");
    let dave = Address::new("0x78731D3Ca6b7E34aC0F824c42a7cC18A495cabaB");

    // 1. Provision the wallet: three approvers, two approvals per transfer
    println!("📋 Provisioning wallet...");
    let config = WalletConfig::new(vec![alice.clone(), bob.clone(), carol.clone()], 2)
        .with_initial_balance(10_000);
    let wallet = Wallet::provision(&config, MemoryStorage::new())
        .await?
        .with_validator(Box::new(EnhancedTransferValidator));

    for approver in wallet.approvers().await {
        println!("  ✓ Approver: {}", approver);
    }
    println!("  Quorum:  {}", wallet.quorum().await);
    println!("  Balance: {} wei\n", wallet.balance().await);

    // 2. Propose and approve a transfer
    println!("💸 Proposing transfer of 1,500 wei to {}...", dave);
    let id = wallet.create_transfer(&alice, 1_500, dave.clone()).await?;

    let outcome = wallet.approve_transfer(&alice, id).await?;
    println!("  ✓ Alice approved: {:?}", outcome);

    match wallet.approve_transfer(&alice, id).await {
        Err(WalletError::DuplicateApproval { .. }) => {
            println!("  ✗ Alice cannot approve twice");
        }
        other => println!("  ? Unexpected: {:?}", other),
    }

    let outcome = wallet.approve_transfer(&carol, id).await?;
    println!("  ✓ Carol approved: {:?}", outcome);

    match wallet.approve_transfer(&bob, id).await {
        Err(WalletError::AlreadySent(_)) => println!("  ✗ Bob is too late, already sent"),
        other => println!("  ? Unexpected: {:?}", other),
    }

    // 3. A transfer larger than the pool waits for a deposit
    println!("\n⏳ Proposing transfer of 20,000 wei...");
    let big = wallet.create_transfer(&bob, 20_000, dave.clone()).await?;
    wallet.approve_transfer(&bob, big).await?;
    if let Err(err) = wallet.approve_transfer(&carol, big).await {
        println!("  ✗ {}", err);
    }
    wallet.deposit(&alice, 15_000).await?;
    wallet.approve_transfer(&carol, big).await?;
    println!("  ✓ Sent after deposit");

    // 4. Final state
    println!("\n📈 Transfers:");
    println!("  {:<4} {:>8} {:<44} {:>9} {:>5}", "Id", "Amount", "Recipient", "Approvals", "Sent");
    for transfer in wallet.transfers().await {
        println!(
            "  {:<4} {:>8} {:<44} {:>9} {:>5}",
            transfer.id,
            transfer.amount,
            transfer.recipient,
            transfer.approvals,
            if transfer.sent { "✅" } else { "🆕" }
        );
    }

    println!("\n  Wallet balance: {} wei", wallet.balance().await);
    println!("  Received by dave: {} wei", wallet.balance_of(&dave).await);
    println!("  Journal entries: {}", wallet.events().await?.len());

    Ok(())
}
