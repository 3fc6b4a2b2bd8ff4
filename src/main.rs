//! StyleAgent 演示入口
//!
//! 初始化日志与配置，注入 Mock 服务，按「聊天 → 上传 → 分析 → 推荐」依次发送命令，
//! 并打印每个状态快照。

use anyhow::Context;
use styleagent::api::{ImageUpload, OutfitFeedback, Services};
use styleagent::config::{load_config, AppConfig};
use styleagent::{create_flow, observability, FlowCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    tracing::info!(app = %cfg.app.name, api = %cfg.api.base_url, "starting");

    let services = Services::mock(&cfg.api);
    let (cmd_tx, mut state_rx) = create_flow(&cfg, services);

    let script = [
        FlowCommand::StartChat,
        FlowCommand::SendMessage(String::new()),
        FlowCommand::SendMessage("I have an office meeting next week".into()),
        FlowCommand::SendMessage("Something classic and timeless".into()),
        FlowCommand::SendMessage("My budget is $100-200".into()),
        FlowCommand::Upload(ImageUpload {
            file_name: "me.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
            conversation_id: None,
        }),
        FlowCommand::Analyze,
        FlowCommand::PollAnalysis,
        FlowCommand::LoadRecommendations,
        FlowCommand::LoadMore,
        FlowCommand::Feedback(OutfitFeedback {
            outfit_id: "outfit-001".into(),
            liked: true,
            saved: true,
            purchased: false,
        }),
        FlowCommand::ShowSimilar("outfit-001".into()),
        FlowCommand::LoadTrending,
        FlowCommand::LoadMore,
        FlowCommand::Quit,
    ];
    for cmd in script {
        cmd_tx.send(cmd).context("flow runtime stopped early")?;
    }

    // 运行时处理完 Quit 后释放发送端，changed() 随之返回错误，循环结束
    while state_rx.changed().await.is_ok() {
        let snapshot = state_rx.borrow_and_update().clone();
        if snapshot.busy {
            continue;
        }
        let cards = &snapshot.recommendations;
        tracing::info!(
            step = ?snapshot.step,
            transcript = snapshot.transcript.len(),
            validation_error = ?snapshot.chat.validation_error,
            analysis = ?snapshot.analysis.data.as_ref().map(|a| a.analysis_id.as_str()),
            cards = cards.data.len(),
            total = cards.total,
            has_more = cards.has_more,
            similar = snapshot.similar.data.as_ref().map_or(0, |s| s.similar_outfits.len()),
            error = ?snapshot.last_error,
            "snapshot"
        );
    }

    if let Some(last) = state_rx.borrow().transcript.last() {
        println!("{}", last.content);
    }
    let summary = serde_json::to_string_pretty(&state_rx.borrow().user_context)
        .context("Failed to render user context")?;
    println!("{summary}");
    Ok(())
}
