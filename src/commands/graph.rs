use crate::cli::GraphArgs;
use crate::fs::{FileSystem, default_fs};
use crate::graph::{AppState, GraphData, generate_static_html};
use crate::style;
use std::path::Path;

use super::CommandContext;

pub fn cmd_graph(args: GraphArgs, config_path: Option<&Path>) -> i32 {
    let fs = default_fs();
    if !args.serve && args.export.is_none() {
        style::error(
            "Use --serve to start the visualization server, or --export to save static HTML",
        );
        return 1;
    }

    let ctx = match CommandContext::new(&args.dataset, config_path, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    if let Some(export_path) = &args.export {
        let code = export(&ctx, export_path, fs);
        if code != 0 || !args.serve {
            return code;
        }
    }

    let state = AppState::new(ctx.dataset, ctx.report, ctx.config.placement, &ctx.name);
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start async runtime: {}", e));
            return 1;
        }
    };

    if let Err(e) = rt.block_on(crate::graph::serve(state, args.port, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}

fn export(ctx: &CommandContext, export_path: &Path, fs: &dyn FileSystem) -> i32 {
    let data = GraphData::build(&ctx.dataset, &ctx.report, &ctx.config.placement, &ctx.name);
    let html = match generate_static_html(&data) {
        Ok(html) => html,
        Err(e) => {
            style::error(&format!("Failed to serialize graph: {}", e));
            return 1;
        }
    };
    if let Err(e) = fs.write(export_path, &html) {
        style::error(&format!("Failed to write export file: {}", e));
        return 1;
    }
    style::success(&format!("Graph exported to: {}", style::path(export_path)));
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DatasetArgs;
    use crate::fs::mock::MockFs;
    use std::path::PathBuf;

    #[test]
    fn test_export_writes_page() {
        let fs = MockFs::with_files([(
            "/data/g.json",
            r#"{"nodes": [{"id": "a"}, {"id": "b"}], "links": [{"source": "a", "target": "b", "strength": 0.9}]}"#,
        )]);
        let args = DatasetArgs {
            graph: PathBuf::from("/data/g.json"),
            survey: None,
            strategy: None,
            threshold: None,
            max_size: None,
        };
        let ctx = CommandContext::new(&args, None, &fs).unwrap();

        assert_eq!(export(&ctx, Path::new("/out/g.html"), &fs), 0);
        let html = fs.get(Path::new("/out/g.html")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#""title":"g""#));
    }
}
