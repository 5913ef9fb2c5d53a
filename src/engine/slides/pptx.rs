//! Serializes a [`Deck`] as a PresentationML (.pptx) package.
//!
//! The package holds one slide master with three layouts (title, title and
//! content, blank), a theme, one part per slide and one media part per
//! embedded picture. Slides are 10in × 7.5in (4:3).

use crate::engine::outcome::ToolError;
use crate::engine::slides::deck::{Deck, EmbeddedImage, ImageKind, Slide};
use crate::error_ext::ToToolError;
use chrono::Utc;
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// English Metric Units per inch.
pub const EMU_PER_INCH: u64 = 914_400;
pub const SLIDE_WIDTH: u64 = 10 * EMU_PER_INCH;
pub const SLIDE_HEIGHT: u64 = 7 * EMU_PER_INCH + EMU_PER_INCH / 2;

const fn inches_tenths(tenths: u64) -> u64 {
    tenths * EMU_PER_INCH / 10
}

// Image slide geometry.
const IMAGE_TITLE_BOX: Rect = Rect::new(inches_tenths(5), inches_tenths(5), inches_tenths(90), inches_tenths(10));
const PICTURE_LEFT: u64 = inches_tenths(10);
const PICTURE_TOP: u64 = inches_tenths(15);
const PICTURE_WIDTH: u64 = inches_tenths(80);
const CAPTION_BOX: Rect = Rect::new(inches_tenths(10), inches_tenths(65), inches_tenths(80), inches_tenths(10));
/// 0.4in expressed in hundredths of a point.
const IMAGE_TITLE_SIZE: u32 = 2880;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: u64,
    y: u64,
    cx: u64,
    cy: u64,
}

impl Rect {
    const fn new(x: u64, y: u64, cx: u64, cy: u64) -> Self {
        Self { x, y, cx, cy }
    }

    fn xfrm(&self) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            self.x, self.y, self.cx, self.cy
        )
    }
}

/// Layouts in the order they appear in the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Title,
    TitleAndContent,
    Blank,
}

impl Layout {
    const ALL: [Self; 3] = [Self::Title, Self::TitleAndContent, Self::Blank];

    fn number(self) -> usize {
        match self {
            Self::Title => 1,
            Self::TitleAndContent => 2,
            Self::Blank => 3,
        }
    }

    fn for_slide(slide: &Slide) -> Self {
        match slide {
            Slide::Title { .. } => Self::Title,
            Slide::Content { .. } => Self::TitleAndContent,
            Slide::Image { .. } => Self::Blank,
        }
    }
}

/// Write `deck` to `path`, creating parent directories and replacing any
/// existing file.
pub fn write_deck(path: &Path, deck: &Deck) -> Result<(), ToolError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).tool_err("Failed to create output directory")?;
    }
    let file = std::fs::File::create(path).tool_err("Failed to create presentation file")?;
    let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, contents) in package_parts(deck, &timestamp) {
        zip.start_file(name, options)
            .tool_err("Failed to write presentation")?;
        zip.write_all(&contents)
            .tool_err("Failed to write presentation")?;
    }
    zip.finish().tool_err("Failed to write presentation")?;
    Ok(())
}

/// Every part of the package as (zip entry name, contents).
fn package_parts(deck: &Deck, timestamp: &str) -> Vec<(String, Vec<u8>)> {
    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types(deck).into_bytes()),
        ("_rels/.rels".into(), root_rels().into_bytes()),
        ("docProps/core.xml".into(), core_props(deck.title(), timestamp).into_bytes()),
        ("docProps/app.xml".into(), app_props(deck.len()).into_bytes()),
        ("ppt/presentation.xml".into(), presentation(deck.len()).into_bytes()),
        (
            "ppt/_rels/presentation.xml.rels".into(),
            presentation_rels(deck.len()).into_bytes(),
        ),
        ("ppt/slideMasters/slideMaster1.xml".into(), slide_master().into_bytes()),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
            slide_master_rels().into_bytes(),
        ),
        ("ppt/theme/theme1.xml".into(), theme().into_bytes()),
    ];
    for layout in Layout::ALL {
        let n = layout.number();
        parts.push((
            format!("ppt/slideLayouts/slideLayout{n}.xml"),
            slide_layout(layout).into_bytes(),
        ));
        parts.push((
            format!("ppt/slideLayouts/_rels/slideLayout{n}.xml.rels"),
            layout_rels().into_bytes(),
        ));
    }

    let mut media = 0;
    for (i, slide) in deck.slides().iter().enumerate() {
        let n = i + 1;
        let image = match slide {
            Slide::Image { image, .. } => {
                media += 1;
                Some((media, image))
            }
            _ => None,
        };
        parts.push((format!("ppt/slides/slide{n}.xml"), slide_xml(slide).into_bytes()));
        parts.push((
            format!("ppt/slides/_rels/slide{n}.xml.rels"),
            slide_rels(Layout::for_slide(slide), image).into_bytes(),
        ));
    }
    for (n, image) in deck.images() {
        parts.push((media_name(n, image), image.bytes.clone()));
    }
    parts
}

fn media_name(n: usize, image: &EmbeddedImage) -> String {
    format!("ppt/media/image{n}.{}", image.kind.extension())
}

fn relationship(id: &str, kind: &str, target: &str) -> String {
    format!(r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#)
}

fn relationships(entries: &[String]) -> String {
    format!(
        r#"{XML_HEADER}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        entries.concat()
    )
}

// ───── Package-level parts ─────

fn content_types(deck: &Deck) -> String {
    let mut xml = format!(
        r#"{XML_HEADER}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#
    );
    let mut kinds: Vec<ImageKind> = Vec::new();
    for (_, image) in deck.images() {
        if !kinds.contains(&image.kind) {
            kinds.push(image.kind);
        }
    }
    for kind in kinds {
        let _ = write!(
            xml,
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            kind.extension(),
            kind.content_type()
        );
    }

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), format!("{CT_BASE}.presentationml.presentation.main+xml")),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), format!("{CT_BASE}.presentationml.slideMaster+xml")),
        ("/ppt/theme/theme1.xml".to_string(), format!("{CT_BASE}.theme+xml")),
        ("/docProps/core.xml".to_string(), "application/vnd.openxmlformats-package.core-properties+xml".to_string()),
        ("/docProps/app.xml".to_string(), format!("{CT_BASE}.extended-properties+xml")),
    ];
    for layout in Layout::ALL {
        overrides.push((
            format!("/ppt/slideLayouts/slideLayout{}.xml", layout.number()),
            format!("{CT_BASE}.presentationml.slideLayout+xml"),
        ));
    }
    for n in 1..=deck.len() {
        overrides.push((
            format!("/ppt/slides/slide{n}.xml"),
            format!("{CT_BASE}.presentationml.slide+xml"),
        ));
    }
    for (part, content_type) in overrides {
        let _ = write!(xml, r#"<Override PartName="{part}" ContentType="{content_type}"/>"#);
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels() -> String {
    relationships(&[
        relationship("rId1", &format!("{REL_BASE}/officeDocument"), "ppt/presentation.xml"),
        relationship(
            "rId2",
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        ),
        relationship("rId3", &format!("{REL_BASE}/extended-properties"), "docProps/app.xml"),
    ])
}

fn core_props(title: &str, timestamp: &str) -> String {
    format!(
        r#"{XML_HEADER}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>{}</dc:creator><cp:revision>1</cp:revision><dcterms:created xsi:type="dcterms:W3CDTF">{timestamp}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{timestamp}</dcterms:modified></cp:coreProperties>"#,
        escape(title),
        env!("CARGO_PKG_NAME"),
    )
}

fn app_props(slides: usize) -> String {
    format!(
        r#"{XML_HEADER}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>{} {}</Application><PresentationFormat>On-screen Show (4:3)</PresentationFormat><Slides>{slides}</Slides></Properties>"#,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
}

// ───── Presentation ─────

/// Relationship ids in presentation.xml.rels: master, theme, then slides.
fn slide_rel_id(n: usize) -> String {
    format!("rId{}", n + 2)
}

fn presentation(slides: usize) -> String {
    let mut xml = format!(
        r#"{XML_HEADER}<p:presentation {NS_MAIN} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#
    );
    if slides > 0 {
        xml.push_str("<p:sldIdLst>");
        for n in 1..=slides {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                255 + n,
                slide_rel_id(n)
            );
        }
        xml.push_str("</p:sldIdLst>");
    }
    let _ = write!(
        xml,
        r#"<p:sldSz cx="{SLIDE_WIDTH}" cy="{SLIDE_HEIGHT}" type="screen4x3"/><p:notesSz cx="{SLIDE_HEIGHT}" cy="{SLIDE_WIDTH}"/></p:presentation>"#
    );
    xml
}

fn presentation_rels(slides: usize) -> String {
    let mut entries = vec![
        relationship("rId1", &format!("{REL_BASE}/slideMaster"), "slideMasters/slideMaster1.xml"),
        relationship("rId2", &format!("{REL_BASE}/theme"), "theme/theme1.xml"),
    ];
    for n in 1..=slides {
        entries.push(relationship(
            &slide_rel_id(n),
            &format!("{REL_BASE}/slide"),
            &format!("slides/slide{n}.xml"),
        ));
    }
    relationships(&entries)
}

// ───── Master, layouts and theme ─────

const GROUP_PROPS: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// A placeholder shape. `ph` is the inner attributes of `<p:ph>`.
fn placeholder(id: u32, name: &str, ph: &str, frame: Option<Rect>, paragraphs: &str) -> String {
    let sp_pr = match frame {
        Some(rect) => format!("<p:spPr>{}</p:spPr>", rect.xfrm()),
        None => "<p:spPr/>".to_string(),
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph}/></p:nvPr></p:nvSpPr>{sp_pr}<p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
    )
}

fn slide_master() -> String {
    let title = placeholder(
        2,
        "Title Placeholder 1",
        r#"type="title""#,
        Some(Rect::new(457_200, 274_638, 8_229_600, 1_143_000)),
        "<a:p/>",
    );
    let body = placeholder(
        3,
        "Text Placeholder 2",
        r#"type="body" idx="1""#,
        Some(Rect::new(457_200, 1_600_200, 8_229_600, 4_525_963)),
        "<a:p/>",
    );
    let mut layout_ids = String::new();
    for layout in Layout::ALL {
        let _ = write!(
            layout_ids,
            r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
            2_147_483_648u64 + layout.number() as u64,
            layout.number()
        );
    }
    format!(
        r#"{XML_HEADER}<p:sldMaster {NS_MAIN}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{GROUP_PROPS}{title}{body}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr algn="ctr"><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900"><a:spcBef><a:spcPct val="20000"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="3200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#
    )
}

fn slide_master_rels() -> String {
    let mut entries: Vec<String> = Layout::ALL
        .into_iter()
        .map(|layout| {
            let n = layout.number();
            relationship(
                &format!("rId{n}"),
                &format!("{REL_BASE}/slideLayout"),
                &format!("../slideLayouts/slideLayout{n}.xml"),
            )
        })
        .collect();
    entries.push(relationship(
        &format!("rId{}", Layout::ALL.len() + 1),
        &format!("{REL_BASE}/theme"),
        "../theme/theme1.xml",
    ));
    relationships(&entries)
}

fn slide_layout(layout: Layout) -> String {
    let (kind, name, shapes) = match layout {
        Layout::Title => (
            "title",
            "Title Slide",
            [
                placeholder(
                    2,
                    "Title 1",
                    r#"type="ctrTitle""#,
                    Some(Rect::new(685_800, 2_130_425, 7_772_400, 1_470_025)),
                    "<a:p/>",
                ),
                placeholder(
                    3,
                    "Subtitle 2",
                    r#"type="subTitle" idx="1""#,
                    Some(Rect::new(1_371_600, 3_886_200, 6_400_800, 1_752_600)),
                    "<a:p/>",
                ),
            ]
            .concat(),
        ),
        Layout::TitleAndContent => (
            "obj",
            "Title and Content",
            [
                placeholder(2, "Title 1", r#"type="title""#, None, "<a:p/>"),
                placeholder(3, "Content Placeholder 2", r#"idx="1""#, None, "<a:p/>"),
            ]
            .concat(),
        ),
        Layout::Blank => ("blank", "Blank", String::new()),
    };
    format!(
        r#"{XML_HEADER}<p:sldLayout {NS_MAIN} type="{kind}" preserve="1"><p:cSld name="{name}"><p:spTree>{GROUP_PROPS}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn layout_rels() -> String {
    relationships(&[relationship(
        "rId1",
        &format!("{REL_BASE}/slideMaster"),
        "../slideMasters/slideMaster1.xml",
    )])
}

fn theme() -> String {
    let solid = |clr: &str| format!(r#"<a:solidFill><a:schemeClr val="{clr}"/></a:solidFill>"#);
    let line = |w: u32| format!(r#"<a:ln w="{w}"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#);
    let fills = [solid("phClr"), solid("phClr"), solid("phClr")].concat();
    let lines = [line(9525), line(25400), line(38100)].concat();
    let effects = r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#.repeat(3);
    format!(
        r#"{XML_HEADER}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{lines}</a:lnStyleLst><a:effectStyleLst>{effects}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
    )
}

// ───── Slides ─────

fn run(text: &str, props: &str) -> String {
    format!(r#"<a:r><a:rPr lang="en-US"{props} dirty="0"/><a:t>{}</a:t></a:r>"#, escape(text))
}

fn paragraph(text: &str) -> String {
    if text.is_empty() {
        return "<a:p/>".to_string();
    }
    format!("<a:p>{}</a:p>", run(text, ""))
}

fn text_box(id: u32, name: &str, frame: Rect, text: &str, props: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square"><a:spAutoFit/></a:bodyPr><a:lstStyle/><a:p>{}</a:p></p:txBody></p:sp>"#,
        frame.xfrm(),
        run(text, props)
    )
}

/// Picture frame: fixed left, top and width; height keeps the aspect ratio.
fn picture_frame(image: &EmbeddedImage) -> Rect {
    let height = PICTURE_WIDTH * u64::from(image.height_px) / u64::from(image.width_px.max(1));
    Rect::new(PICTURE_LEFT, PICTURE_TOP, PICTURE_WIDTH, height)
}

fn picture(id: u32, rel_id: &str, image: &EmbeddedImage) -> String {
    let name = image
        .source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {}" descr="{}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        id - 1,
        escape(&name),
        picture_frame(image).xfrm()
    )
}

fn slide_xml(slide: &Slide) -> String {
    let shapes = match slide {
        Slide::Title { title, subtitle } => {
            let mut shapes = placeholder(2, "Title 1", r#"type="ctrTitle""#, None, &paragraph(title));
            if let Some(subtitle) = subtitle {
                shapes.push_str(&placeholder(
                    3,
                    "Subtitle 2",
                    r#"type="subTitle" idx="1""#,
                    None,
                    &paragraph(subtitle),
                ));
            }
            shapes
        }
        Slide::Content { title, bullets } => {
            let body = if bullets.is_empty() {
                "<a:p/>".to_string()
            } else {
                bullets.iter().map(|b| paragraph(b)).collect()
            };
            [
                placeholder(2, "Title 1", r#"type="title""#, None, &paragraph(title)),
                placeholder(3, "Content Placeholder 2", r#"idx="1""#, None, &body),
            ]
            .concat()
        }
        Slide::Image {
            title,
            image,
            caption,
        } => {
            let mut shapes = text_box(
                2,
                "TextBox 1",
                IMAGE_TITLE_BOX,
                title,
                &format!(r#" sz="{IMAGE_TITLE_SIZE}" b="1""#),
            );
            shapes.push_str(&picture(3, "rId2", image));
            if let Some(caption) = caption {
                shapes.push_str(&text_box(4, "TextBox 3", CAPTION_BOX, caption, ""));
            }
            shapes
        }
    };
    format!(
        r#"{XML_HEADER}<p:sld {NS_MAIN}><p:cSld><p:spTree>{GROUP_PROPS}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn slide_rels(layout: Layout, image: Option<(usize, &EmbeddedImage)>) -> String {
    let mut entries = vec![relationship(
        "rId1",
        &format!("{REL_BASE}/slideLayout"),
        &format!("../slideLayouts/slideLayout{}.xml", layout.number()),
    )];
    if let Some((n, image)) = image {
        entries.push(relationship(
            "rId2",
            &format!("{REL_BASE}/image"),
            &format!("../media/image{n}.{}", image.kind.extension()),
        ));
    }
    relationships(&entries)
}
