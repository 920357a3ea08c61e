use std::{fs::File, io::Write, path::Path};

use anyhow::{bail, Context, Result};
use clap::Parser;
use delegate_client::{
    config::{Command, Config},
    keypair::{read_keypair_file, write_keypair_file},
    logger::setup_logger,
    DelegateClient, Provider,
};
use delegate_common::crypto::KeyPair;
use log::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let mut config: Config = Config::parse();
    if let Some(path) = config.config_file.as_ref() {
        if config.generate_config_template {
            if Path::new(path).exists() {
                eprintln!("Config file already exists at {}", path);
                return Ok(());
            }

            let mut file = File::create(path).context("Error while creating config file")?;
            let json = serde_json::to_string_pretty(&config).context("Error while serializing config file")?;
            file.write_all(json.as_bytes()).context("Error while writing config file")?;
            println!("Config file template generated at {}", path);
            return Ok(());
        }

        // the command line always picks the command
        let command = config.command.take();
        let file = File::open(path).context("Error while opening config file")?;
        config = serde_json::from_reader(file).context("Error while reading config file")?;
        config.command = command;
    } else if config.generate_config_template {
        eprintln!("Provided config file path is required to generate the template with --config-file");
        return Ok(());
    }

    let log_config = &config.log;
    setup_logger(
        log_config.log_level,
        log_config.file_log_level,
        log_config.log_file.as_deref().map(Path::new),
        log_config.disable_log_color,
        &log_config.datetime_format,
    )
    .context("Error while setting up the logger")?;

    let Some(command) = config.command.take() else {
        bail!("No command given, see --help");
    };

    if let Err(e) = run(&config, command).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(config: &Config, command: Command) -> Result<()> {
    if let Command::Keygen { outfile, force } = &command {
        if outfile.exists() && !force {
            bail!("{} already exists, use --force to overwrite it", outfile.display());
        }
        let keypair = KeyPair::new();
        write_keypair_file(&keypair, outfile).context("Error while writing keypair file")?;
        info!("Keypair written to {}", outfile.display());
        println!("{}", keypair.public_key());
        return Ok(());
    }

    let provider_config = config.provider.resolve()?;
    if let Command::Address = command {
        let wallet = read_keypair_file(&provider_config.wallet)
            .with_context(|| format!("Error while reading wallet {}", provider_config.wallet.display()))?;
        println!("{}", wallet.public_key());
        return Ok(());
    }

    let provider = Provider::from_config(&provider_config)
        .await
        .context("Error while setting up the provider")?;
    let client = DelegateClient::new(provider);

    let signature = match command {
        Command::InitConfig { cooldown, operator } => match operator {
            Some(operator) => client.init_config_with_operator(&operator, cooldown).await?,
            None => client.init_config(cooldown).await?,
        },
        Command::GrantAccess { user } => client.grant_access(&user).await?,
        Command::RevokeAccess { user } => client.revoke_access(&user).await?,
        Command::ProposeAdmin { new_admin } => client.propose_new_admin(&new_admin).await?,
        Command::AcceptAdmin => client.accept_admin_transfer().await?,
        Command::SetCooldown { seconds } => client.modify_cooldown_duration(seconds).await?,
        Command::SetOperator { operator } => client.modify_operator(&operator).await?,
        Command::Pause => client.pause(true).await?,
        Command::Unpause => client.pause(false).await?,
        Command::ShowConfig => {
            let program_config = client.config().await?;
            let json = serde_json::to_string_pretty(&program_config)
                .context("Error while serializing the program config")?;
            println!("{}", json);
            return Ok(());
        }
        Command::Keygen { .. } | Command::Address => return Ok(()),
    };

    println!("{}", signature);
    Ok(())
}
