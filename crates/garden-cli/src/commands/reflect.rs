use super::utils::{load_config, open_session, write_output};
use anyhow::Result;
use std::path::Path;

pub async fn run(config: Option<&Path>, file: &Path, out: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let (usecase, session_id) = open_session(&config, file).await?;

    usecase.generate_reflection(&session_id).await?;
    let view = usecase.reflection_view(&session_id).await?;
    match out {
        Some(_) => {
            for sentence in &view.reflection_sentences {
                eprintln!("{sentence}");
            }
            write_output(out, &usecase.export_session(&session_id).await?)
        }
        None => {
            for sentence in &view.reflection_sentences {
                println!("{sentence}");
            }
            Ok(())
        }
    }
}
