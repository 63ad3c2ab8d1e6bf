use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::export::logic::ExportRequest;
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        kind,
        format,
        file,
        period,
        space,
        force,
    } = cmd
    {
        let mut pool = open_db(&cfg.database)?;
        let req = ExportRequest {
            kind: *kind,
            format: *format,
            file: file.clone(),
            period: period.clone(),
            space: *space,
            force: *force,
        };
        ExportLogic::export(&mut pool, cfg, &req, date::today())?;
    }
    Ok(())
}
