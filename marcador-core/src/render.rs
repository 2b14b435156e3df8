//! # Renderização HTML
//!
//! Gera a visualização das entidades destacadas inline no texto. O contrato é
//! uma trait ([`Renderer`]) — qualquer backend que receba texto + spans e
//! devolva uma string serve. A implementação padrão ([`HtmlRenderer`]) produz
//! uma página autocontida: o texto original com cada entidade envolta em
//! `<mark>` colorido por rótulo, com o rótulo sobrescrito ao lado do trecho.
//!
//! O destaque é construído em **uma única passada com cursor**: fatias do
//! texto escapadas intercaladas com as marcações, evitando o deslocamento de
//! offsets que inserções in-place causariam.

use crate::error::CollaboratorError;
use crate::span::EntitySpan;

/// Colaborador de apresentação: renderiza texto + spans como HTML.
///
/// Recebe a sequência **reconciliada** (ordenada, sem sobreposições).
pub trait Renderer: Send + Sync {
    fn render(&self, text: &str, spans: &[EntitySpan]) -> Result<String, CollaboratorError>;
}

/// Renderizador HTML padrão.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    /// Título da página gerada.
    pub page_title: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self {
            page_title: "Entidades Nomeadas".to_string(),
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapa os metacaracteres HTML de um trecho de texto.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Cor de destaque para um rótulo. Rótulos conhecidos têm cores fixas;
/// customizados recebem uma cor estável derivada do próprio rótulo.
fn label_color(label: &str) -> &'static str {
    const PALETTE: &[&str] = &[
        "#06b6d4", "#84cc16", "#f43f5e", "#a855f7", "#eab308", "#0ea5e9",
    ];
    match label {
        "PER" | "PERSON" => "#3b82f6",  // azul
        "ORG" => "#10b981",             // verde esmeralda
        "LOC" | "GPE" => "#f59e0b",     // âmbar
        "DATE" => "#8b5cf6",            // violeta
        "MONEY" => "#14b8a6",           // turquesa
        "PERCENT" => "#ec4899",         // rosa
        _ => {
            // Hash simples e determinístico sobre os bytes do rótulo
            let h = label.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            PALETTE[h % PALETTE.len()]
        }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, text: &str, spans: &[EntitySpan]) -> Result<String, CollaboratorError> {
        // Texto destacado: fatias escapadas + <mark>, em uma passada
        let mut pieces: Vec<String> = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0usize;

        for span in spans {
            if span.start < cursor || span.end > text.len() || span.start >= span.end {
                continue; // span fora de ordem ou inválido: pula sem quebrar a página
            }
            if span.start > cursor {
                pieces.push(html_escape(&text[cursor..span.start]));
            }
            let color = label_color(&span.label);
            pieces.push(format!(
                r#"<mark style="background:{color}22;border-bottom:2px solid {color}" title="{label} [{start}..{end}] ({source})">{segment}<sup>{label}</sup></mark>"#,
                color = color,
                label = html_escape(&span.label),
                start = span.start,
                end = span.end,
                source = span.source.name(),
                segment = html_escape(&span.text),
            ));
            cursor = span.end;
        }
        if cursor < text.len() {
            pieces.push(html_escape(&text[cursor..]));
        }
        let highlighted = pieces.join("");

        let html = format!(
            r#"<!doctype html>
<html lang="pt-BR">
<head>
<meta charset="utf-8" />
<title>{title}</title>
<style>
body {{ font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2rem auto; max-width: 48rem; line-height: 2; color: #1f2937; }}
h1 {{ font-size: 1.2rem; color: #6b7280; }}
mark {{ border-radius: 3px; padding: 0 2px; }}
mark sup {{ font-size: 0.6em; font-weight: 700; margin-left: 2px; color: #374151; }}
p.texto {{ white-space: pre-wrap; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p class="texto">{highlighted}</p>
</body>
</html>
"#,
            title = html_escape(&self.page_title),
            highlighted = highlighted,
        );
        Ok(html)
    }
}
