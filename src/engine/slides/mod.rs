//! The PowerPoint-Creator server: in-memory slide decks saved as .pptx files.

pub mod deck;
pub mod pptx;
pub mod tools;

use crate::config::SlidesConfig;
use crate::engine::outcome::{DocumentKind, Note, ToolOutput, ToolResult, non_empty};
use crate::engine::registry::Registry;
use crate::engine::run_blocking;
use crate::engine::server::DocumentServer;
use deck::{Deck, EmbeddedImage, Slide};
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tools::{
    AddContentSlideArgs, AddImageSlideArgs, AddTitleSlideArgs, CreatePresentationArgs,
    SavePresentationArgs, SlideCall, SlideTool,
};
use tracing::info;

#[derive(Clone)]
pub struct SlideServer {
    config: Arc<SlidesConfig>,
    decks: Arc<Mutex<Registry<Deck>>>,
}

impl SlideServer {
    pub fn new(config: SlidesConfig) -> Self {
        Self {
            config: Arc::new(config),
            decks: Arc::new(Mutex::new(Registry::new(DocumentKind::Presentation))),
        }
    }

    pub async fn handle(&self, name: &str, arguments: Option<JsonObject>) -> ToolResult {
        match SlideCall::parse(name, arguments)? {
            SlideCall::CreatePresentation(args) => self.create_presentation(args).await,
            SlideCall::AddTitleSlide(args) => self.add_title_slide(args).await,
            SlideCall::AddContentSlide(args) => self.add_content_slide(args).await,
            SlideCall::AddImageSlide(args) => self.add_image_slide(args).await,
            SlideCall::SavePresentation(args) => self.save_presentation(args).await,
        }
    }

    // ───── Tool implementations ─────

    pub async fn create_presentation(&self, args: CreatePresentationArgs) -> ToolResult {
        self.decks
            .lock()
            .await
            .create(&args.filename, Deck::new(args.title.clone()));
        info!(presentation = %args.filename, "Created presentation");
        Ok(ToolOutput::new(format!(
            "Presentation '{}' created (file: {})",
            args.title, args.filename
        )))
    }

    pub async fn add_title_slide(&self, args: AddTitleSlideArgs) -> ToolResult {
        let mut decks = self.decks.lock().await;
        let deck = decks.require_mut(&args.filename)?;
        let headline = format!("Title slide added: '{}'", args.title);
        deck.push(Slide::Title {
            title: args.title,
            subtitle: non_empty(args.subtitle),
        });
        Ok(ToolOutput::new(headline))
    }

    pub async fn add_content_slide(&self, args: AddContentSlideArgs) -> ToolResult {
        let mut decks = self.decks.lock().await;
        let deck = decks.require_mut(&args.filename)?;
        let headline = format!(
            "Content slide added: '{}' with {} points",
            args.title,
            args.content.len()
        );
        deck.push(Slide::Content {
            title: args.title,
            bullets: args.content,
        });
        Ok(ToolOutput::new(headline))
    }

    /// The image is read and probed before the slide is appended; any failure
    /// leaves the deck unchanged.
    pub async fn add_image_slide(&self, args: AddImageSlideArgs) -> ToolResult {
        let mut decks = self.decks.lock().await;
        let deck = decks.require_mut(&args.filename)?;

        let path = PathBuf::from(&args.image_path);
        let image = run_blocking(move || EmbeddedImage::load(&path)).await?;
        let caption = non_empty(args.caption);

        let mut headline = format!("Image slide added: '{}'", args.title);
        if caption.is_some() {
            headline.push_str(" (with caption)");
        }
        deck.push(Slide::Image {
            title: args.title,
            image,
            caption,
        });
        Ok(ToolOutput::new(headline))
    }

    pub async fn save_presentation(&self, args: SavePresentationArgs) -> ToolResult {
        let decks = self.decks.lock().await;
        let deck = decks.require(&args.filename)?;

        let dir = non_empty(args.output_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.default_dir.clone());
        let path = dir.join(format!("{}.pptx", args.filename));
        let snapshot = deck.clone();
        let target = path.clone();
        run_blocking(move || pptx::write_deck(&target, &snapshot)).await?;

        info!(presentation = %args.filename, path = %path.display(), "Saved presentation");
        Ok(
            ToolOutput::new(format!("Presentation saved: {}", path.display()))
                .note(Note::Stats(format!("{} slides", deck.len()))),
        )
    }

    /// Summary of every open deck, for the documents resource.
    pub async fn list_decks(&self) -> Value {
        let decks = self.decks.lock().await;
        let items: Vec<Value> = decks
            .iter()
            .map(|(name, deck)| {
                let slides: Vec<Value> = deck
                    .slides()
                    .iter()
                    .map(|slide| json!({ "kind": slide.kind(), "title": slide.title() }))
                    .collect();
                json!({ "name": name, "title": deck.title(), "slides": slides })
            })
            .collect();
        Value::Array(items)
    }

    #[cfg(test)]
    async fn deck(&self, name: &str) -> Option<Deck> {
        self.decks.lock().await.get(name).cloned()
    }
}

impl DocumentServer for SlideServer {
    const NAME: &'static str = "PowerPoint-Creator";
    const TITLE: &'static str = "PowerPoint Creator";
    const SCHEME: &'static str = "slides";
    const INSTRUCTIONS: &'static str = "Slide deck MCP server. \
        Create a deck with create_presentation, then append slides with add_title_slide, \
        add_content_slide (bulleted list) and add_image_slide (png, jpeg, gif, bmp or tiff). \
        Nothing is written until save_presentation, which writes <output_path>/<filename>.pptx. \
        Resources: slides://documents lists open decks, slides://logs returns recent server logs.";

    fn tools(&self) -> Vec<Tool> {
        SlideTool::ALL.into_iter().map(SlideTool::describe).collect()
    }

    async fn call(&self, name: &str, arguments: Option<JsonObject>) -> ToolResult {
        self.handle(name, arguments).await
    }

    async fn documents(&self) -> Value {
        self.list_decks().await
    }
}
