use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use maxi_state::ProgramStateInformation;
use maxi_store::{LocalParameterStore, SettingsAssembler, SettingsWriter, StoreKey, SyncConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("maxi-settings")
        .version(maxi_store::VERSION)
        .about("Inspect and update vault-maxi settings in a parameter file")
        .subcommand_required(true)
        .arg(
            Arg::new("store")
                .long("store")
                .required(true)
                .help("JSON parameter file"),
        )
        .arg(
            Arg::new("post-fix")
                .long("post-fix")
                .global(true)
                .allow_hyphen_values(true)
                .help("Deployment namespace suffix (default: $VAULTMAXI_STORE_POSTIX)"),
        )
        .arg(
            Arg::new("seed-key")
                .long("seed-key")
                .global(true)
                .help("Seed parameter key (default: $DEFICHAIN_SEED_KEY)"),
        )
        .subcommand(
            Command::new("show")
                .about("Fetch and print all settings; secrets are redacted")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(Command::new("keys").about("List the external key of every setting"))
        .subcommand(
            Command::new("set-lm-token")
                .about("Write the liquidity mining token")
                .arg(Arg::new("token").required(true).help("Token symbol, e.g. BTC")),
        )
        .subcommand(Command::new("reset-state").about("Write an idle program state"))
}

fn sync_config(matches: &ArgMatches) -> SyncConfig {
    let mut config = SyncConfig::from_env();
    if let Some(post_fix) = matches.get_one::<String>("post-fix") {
        config = config.with_post_fix(post_fix.as_str());
    }
    if let Some(seed_key) = matches.get_one::<String>("seed-key") {
        config = config.with_seed_key(seed_key.as_str());
    }
    config
}

async fn show(assembler: &SettingsAssembler<Arc<LocalParameterStore>>, json: bool) -> Result<()> {
    let settings = assembler
        .assemble()
        .await
        .context("failed to fetch settings")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        println!("{settings:#?}");
    }
    Ok(())
}

fn list_keys(config: &SyncConfig) {
    for key in StoreKey::ALL {
        println!("{:<28} {}", format!("{key:?}"), config.external_key(key));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let path = matches
        .get_one::<String>("store")
        .context("--store is required")?;
    let config = sync_config(&matches);
    let store = Arc::new(LocalParameterStore::new(path));

    match matches.subcommand() {
        Some(("show", args)) => {
            let assembler = SettingsAssembler::new(store, config);
            show(&assembler, args.get_flag("json")).await?;
        }
        Some(("keys", _)) => list_keys(&config),
        Some(("set-lm-token", args)) => {
            let token = args
                .get_one::<String>("token")
                .context("token is required")?;
            SettingsWriter::new(store, config.param_post_fix)
                .write_lm_token(token)
                .await
                .context("failed to write LM token")?;
            tracing::info!("LM token set to {}", token);
        }
        Some(("reset-state", _)) => {
            SettingsWriter::new(store, config.param_post_fix)
                .write_program_state(&ProgramStateInformation::default())
                .await
                .context("failed to reset program state")?;
            tracing::info!("Program state reset");
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let matches = cli()
            .try_get_matches_from([
                "maxi-settings",
                "--store",
                "params.json",
                "--post-fix",
                "-test",
                "--seed-key",
                "/custom/seed",
                "keys",
            ])
            .unwrap();

        let config = sync_config(&matches);
        assert_eq!(config.param_post_fix, "-test");
        assert_eq!(config.seed_key, "/custom/seed");
    }

    #[tokio::test]
    async fn set_token_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let store = Arc::new(LocalParameterStore::new(&path));
        let config = SyncConfig::new().with_post_fix("-cli");

        SettingsWriter::new(store.clone(), config.param_post_fix.clone())
            .write_lm_token("DUSD")
            .await
            .unwrap();

        let settings = SettingsAssembler::new(store, config).assemble().await.unwrap();
        assert_eq!(settings.lm_token.as_deref(), Some("DUSD"));
    }
}
