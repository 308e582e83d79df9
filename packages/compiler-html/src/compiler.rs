use mailblocks_model::style::is_transparent;
use mailblocks_model::{
    ButtonBlock, ColumnBlock, ContentBlock, DividerBlock, Document, EmailBlock, ImageBlock, RowBlock, SpacerBlock,
    TextBlock,
};
use tracing::debug;

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Contents of `<title>`
    pub title: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            title: "Email".to_string(),
        }
    }
}

/// Attributes shared by every layout table
const TABLE_ATTRS: &str = r#"role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0""#;

/// Image source used when a block has none
const FALLBACK_IMAGE_SRC: &str = "/placeholder.svg";

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    /// Emit `open`, the body at one extra level, then `close`
    fn nested(&mut self, open: &str, close: &str, body: impl FnOnce(&mut Self)) {
        self.add_line(open);
        self.indent();
        body(self);
        self.dedent();
        self.add_line(close);
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Inline CSS declarations, rendered in insertion order
#[derive(Default)]
struct Declarations(Vec<(&'static str, String)>);

impl Declarations {
    fn new() -> Self {
        Self::default()
    }

    fn set(mut self, property: &'static str, value: impl ToString) -> Self {
        self.0.push((property, value.to_string()));
        self
    }

    /// Background colors are dropped when transparent
    fn background(self, color: &str) -> Self {
        if is_transparent(color) {
            self
        } else {
            self.set("background-color", color)
        }
    }

    fn to_attr(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let css = self
            .0
            .iter()
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect::<Vec<_>>()
            .join(" ");
        format!(" style=\"{}\"", escape_html(&css))
    }
}

/// Compile an email document to a standalone HTML page
pub fn compile_to_html(document: &Document, options: CompileOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.nested("<html>", "</html>", |ctx| {
        compile_head(ctx);

        let body_style = Declarations::new()
            .set("margin", 0)
            .set("padding", 0)
            .set("background-color", &document.style.background_color)
            .set("font-family", &document.style.font_family);
        let outer_style = Declarations::new()
            .set("max-width", format!("{}px", document.style.max_width))
            .set("margin", "0 auto");

        ctx.nested(&format!("<body{}>", body_style.to_attr()), "</body>", |ctx| {
            ctx.nested(
                &format!("<table {}{}>", TABLE_ATTRS, outer_style.to_attr()),
                "</table>",
                |ctx| {
                    ctx.nested("<tbody>", "</tbody>", |ctx| {
                        for block in &document.blocks {
                            ctx.nested("<tr>", "</tr>", |ctx| {
                                ctx.nested("<td>", "</td>", |ctx| compile_block(block, ctx));
                            });
                        }
                    });
                },
            );
        });
    });

    let html = ctx.get_output();
    debug!(blocks = document.blocks.len(), bytes = html.len(), "Compiled email");
    html
}

/// Compile with default options
pub fn compile(document: &Document) -> String {
    compile_to_html(document, CompileOptions::default())
}

fn compile_head(ctx: &mut Context) {
    let title = escape_html(&ctx.options.title);
    ctx.nested("<head>", "</head>", |ctx| {
        ctx.add_line("<meta charset=\"utf-8\">");
        ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
        ctx.add_line(&format!("<title>{}</title>", title));
    });
}

fn compile_block(block: &EmailBlock, ctx: &mut Context) {
    match block {
        EmailBlock::Row(row) => compile_row(row, ctx),
        EmailBlock::Text(text) => compile_standalone(ctx, |ctx| compile_text(text, ctx)),
        EmailBlock::Image(image) => compile_standalone(ctx, |ctx| compile_image(image, ctx)),
        EmailBlock::Button(button) => compile_standalone(ctx, |ctx| compile_button(button, ctx)),
        EmailBlock::Spacer(spacer) => compile_standalone(ctx, |ctx| compile_spacer(spacer, ctx)),
        EmailBlock::Divider(divider) => compile_standalone(ctx, |ctx| compile_divider(divider, ctx)),
    }
}

fn layout_table(style: &Declarations, ctx: &mut Context, body: impl FnOnce(&mut Context)) {
    ctx.nested(
        &format!("<table {}{}>", TABLE_ATTRS, style.to_attr()),
        "</table>",
        |ctx| ctx.nested("<tbody>", "</tbody>", body),
    );
}

fn compile_row(row: &RowBlock, ctx: &mut Context) {
    let style = Declarations::new()
        .background(&row.style.background_color)
        .set("padding", format!("{}px", row.style.padding));

    layout_table(&style, ctx, |ctx| {
        ctx.nested("<tr>", "</tr>", |ctx| {
            for column in &row.columns {
                compile_column(column, ctx);
            }
        });
    });
}

fn compile_column(column: &ColumnBlock, ctx: &mut Context) {
    let style = Declarations::new()
        .background(&column.style.background_color)
        .set("padding", format!("{}px", column.style.padding))
        .set("vertical-align", column.style.vertical_align);

    ctx.nested(
        &format!("<td width=\"{}%\"{}>", column.width, style.to_attr()),
        "</td>",
        |ctx| {
            layout_table(&Declarations::new(), ctx, |ctx| {
                if column.blocks.is_empty() {
                    // Keeps empty columns from collapsing in mail clients
                    ctx.nested("<tr>", "</tr>", |ctx| {
                        ctx.add_line("<td style=\"font-size: 1px; line-height: 1px;\">&nbsp;</td>");
                    });
                }
                for block in &column.blocks {
                    ctx.nested("<tr>", "</tr>", |ctx| compile_content(block, ctx));
                }
            });
        },
    );
}

/// Top-level content gets its own one-cell table
fn compile_standalone(ctx: &mut Context, cell: impl FnOnce(&mut Context)) {
    layout_table(&Declarations::new(), ctx, |ctx| {
        ctx.nested("<tr>", "</tr>", cell);
    });
}

/// Emit the `<td>` for one content block
fn compile_content(block: &ContentBlock, ctx: &mut Context) {
    match block {
        ContentBlock::Text(text) => compile_text(text, ctx),
        ContentBlock::Image(image) => compile_image(image, ctx),
        ContentBlock::Button(button) => compile_button(button, ctx),
        ContentBlock::Spacer(spacer) => compile_spacer(spacer, ctx),
        ContentBlock::Divider(divider) => compile_divider(divider, ctx),
    }
}

fn compile_text(text: &TextBlock, ctx: &mut Context) {
    let s = &text.style;
    let style = Declarations::new()
        .set("font-size", format!("{}px", s.font_size))
        .set("font-weight", s.font_weight)
        .set("font-family", &s.font_family)
        .set("text-align", s.text_align)
        .set("color", &s.color)
        .background(&s.background_color)
        .set("padding", s.padding.to_css())
        .set("line-height", s.line_height);

    ctx.nested(&format!("<td{}>", style.to_attr()), "</td>", |ctx| {
        // Text content is authored HTML and goes out as-is
        ctx.add_line(&format!("<div>{}</div>", text.content));
    });
}

fn compile_image(image: &ImageBlock, ctx: &mut Context) {
    let cell = Declarations::new()
        .set("text-align", image.style.text_align)
        .set("padding", format!("{}px", image.style.padding));
    let img_style = Declarations::new()
        .set("width", &image.style.width)
        .set("height", &image.style.height)
        .set("max-width", "100%")
        .set("display", "block");

    let src = if image.src.is_empty() {
        FALLBACK_IMAGE_SRC
    } else {
        image.src.as_str()
    };
    let img = format!(
        "<img src=\"{}\" alt=\"{}\"{} />",
        escape_html(src),
        escape_html(&image.alt),
        img_style.to_attr()
    );

    ctx.nested(&format!("<td{}>", cell.to_attr()), "</td>", |ctx| {
        match image.href.as_deref().filter(|href| !href.is_empty()) {
            Some(href) => ctx.nested(&format!("<a href=\"{}\">", escape_html(href)), "</a>", |ctx| {
                ctx.add_line(&img)
            }),
            None => ctx.add_line(&img),
        }
    });
}

fn compile_button(button: &ButtonBlock, ctx: &mut Context) {
    let s = &button.style;
    let cell = Declarations::new()
        .set("text-align", s.text_align)
        .set("padding", format!("{}px", s.padding));
    let shape = Declarations::new()
        .set("background-color", &s.background_color)
        .set("border-radius", format!("{}px", s.border_radius));
    let link = Declarations::new()
        .set("display", "block")
        .set("color", &s.color)
        .set("padding", format!("{}px 24px", s.padding))
        .set("text-decoration", "none")
        .set("font-size", format!("{}px", s.font_size))
        .set("font-weight", s.font_weight);

    ctx.nested(&format!("<td{}>", cell.to_attr()), "</td>", |ctx| {
        ctx.nested(
            "<table role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\" style=\"display: inline-table;\">",
            "</table>",
            |ctx| {
                ctx.nested("<tbody>", "</tbody>", |ctx| {
                    ctx.nested("<tr>", "</tr>", |ctx| {
                        ctx.nested(&format!("<td{}>", shape.to_attr()), "</td>", |ctx| {
                            ctx.add_line(&format!(
                                "<a href=\"{}\"{}>{}</a>",
                                escape_html(&button.href),
                                link.to_attr(),
                                escape_html(&button.text)
                            ));
                        });
                    });
                });
            },
        );
    });
}

fn compile_spacer(spacer: &SpacerBlock, ctx: &mut Context) {
    let style = Declarations::new()
        .set("height", format!("{}px", spacer.height))
        .set("line-height", format!("{}px", spacer.height))
        .set("font-size", "1px");
    ctx.add_line(&format!("<td{}>&nbsp;</td>", style.to_attr()));
}

fn compile_divider(divider: &DividerBlock, ctx: &mut Context) {
    let s = &divider.style;
    let cell = Declarations::new().set("padding", format!("{}px", s.padding));
    let rule = Declarations::new()
        .set("border-top", format!("{}px solid {}", s.thickness, s.color))
        .set("font-size", "1px")
        .set("line-height", "1px");

    ctx.nested(&format!("<td{}>", cell.to_attr()), "</td>", |ctx| {
        layout_table(&Declarations::new(), ctx, |ctx| {
            ctx.nested("<tr>", "</tr>", |ctx| {
                ctx.add_line(&format!("<td{}>&nbsp;</td>", rule.to_attr()));
            });
        });
    });
}

/// Escape text for use in HTML attribute values and element content
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
