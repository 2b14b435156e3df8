//! # Tokenizador com Preservação de Offsets
//!
//! Divide o texto bruto em tokens (palavras, números, pontuações) mantendo a
//! posição de byte de cada um no texto original. Os offsets alimentam tanto o
//! reconhecedor heurístico quanto o casador de padrões, e no fim permitem
//! destacar as entidades no HTML sem alterar a formatação original.
//!
//! O algoritmo é um acumulador caractere a caractere:
//! - Letras, dígitos e hífens/apóstrofos internos continuam o token corrente.
//! - Ponto final é mantido junto de abreviações conhecidas ("Dr.", "Inc.")
//!   e de números decimais ("3.14"); caso contrário vira token próprio.
//! - Qualquer outra pontuação é um token de um caractere.

use serde::{Deserialize, Serialize};

/// Um token extraído do texto original.
///
/// Unidade atômica de processamento. Mantém a referência exata de sua posição
/// no texto (`start` e `end`, em bytes), crucial para construir spans de
/// entidade consistentes com a fatia original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// O texto do token (ex: "Rust", ",", "3.14").
    pub text: String,
    /// Offset de byte inicial no texto original (inclusivo).
    pub start: usize,
    /// Offset de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Abreviações cujo ponto final faz parte do token.
const ABBREVIATIONS: &[&str] = &[
    "Dr", "Mr", "Mrs", "Ms", "Prof", "Sr", "Jr", "St", "Ave",
    "Inc", "Ltd", "Corp", "Co", "No", "Vol", "Fig", "vs", "etc",
];

/// Tokeniza um texto preservando offsets de byte.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut current = String::new();
    let mut current_start = 0usize;

    let mut i = 0;
    while i < chars.len() {
        let (pos, ch) = chars[i];

        if ch.is_alphanumeric() || ((ch == '-' || ch == '\'' || ch == '\u{2019}') && !current.is_empty()) {
            if current.is_empty() {
                current_start = pos;
            }
            current.push(ch);
        } else if ch == '.' && !current.is_empty() {
            let is_abbrev = ABBREVIATIONS.contains(&current.as_str());
            let current_is_num = current.chars().all(|c| c.is_ascii_digit());
            let next_is_digit = chars
                .get(i + 1)
                .map(|(_, c)| c.is_ascii_digit())
                .unwrap_or(false);

            if is_abbrev || (current_is_num && next_is_digit) {
                // "Dr." e "3.14" permanecem um token só
                current.push('.');
            } else {
                flush_token(&mut tokens, &mut current, current_start, pos);
                push_punct(&mut tokens, '.', pos);
            }
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current, current_start, pos);
        } else {
            flush_token(&mut tokens, &mut current, current_start, pos);
            push_punct(&mut tokens, ch, pos);
        }
        i += 1;
    }
    flush_token(&mut tokens, &mut current, current_start, text.len());

    for (index, token) in tokens.iter_mut().enumerate() {
        token.index = index;
    }
    tokens
}

/// Fecha o token acumulado e adiciona à lista (se não vazio).
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if !text.is_empty() {
        tokens.push(Token {
            text: text.clone(),
            start,
            end,
            index: 0, // reatribuído no final
        });
        text.clear();
    }
}

/// Adiciona um token de pontuação de um caractere.
fn push_punct(tokens: &mut Vec<Token>, ch: char, pos: usize) {
    tokens.push(Token {
        text: ch.to_string(),
        start: pos,
        end: pos + ch.len_utf8(),
        index: 0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_words_and_period() {
        let tokens = tokenize("Go and Rust are languages.");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Go", "and", "Rust", "are", "languages", "."]);
        assert_eq!(tokens[2].start, 7);
        assert_eq!(tokens[2].end, 11);
    }

    #[test]
    fn test_offsets_reconstruct_original() {
        let text = "PyTorch, TensorFlow e MXNet.";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_abbreviation_keeps_dot() {
        let tokens = tokenize("Dr. Silva trabalha na Acme Inc. desde 2020");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"Dr."));
        assert!(texts.contains(&"Inc."));
    }

    #[test]
    fn test_decimal_number_stays_together() {
        let tokens = tokenize("cresceu 3.5% em 2024");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"3.5"));
        assert!(texts.contains(&"%"));
    }

    #[test]
    fn test_hyphenated_word() {
        let tokens = tokenize("open-source é comum");
        assert_eq!(tokens[0].text, "open-source");
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "São Paulo";
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(&text[tokens[0].start..tokens[0].end], "São");
        assert_eq!(&text[tokens[1].start..tokens[1].end], "Paulo");
    }
}
