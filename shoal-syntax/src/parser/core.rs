// This file is part of shoal, an interactive POSIX-style shell.
// Copyright (C) 2026 the shoal developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Fundamentals for implementing the parser

use super::error::Error;
use super::error::SyntaxError;
use super::lex::{is_blank, Keyword, Lexer, Token, TokenId};
use crate::alias::{EmptyGlossary, Glossary};
use crate::syntax::HereDoc;
use std::rc::Rc;

/// Entire result of parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Modifier that makes a parse result optional in order to restart the
/// parser after alias substitution
///
/// A parsing function returns `AliasSubstituted` when it has replaced an
/// alias name without consuming any token. The caller must then restart
/// parsing so the substituted source is recognized from scratch; for
/// example, an alias may expand to `! true`, whose `!` must be seen by the
/// pipeline parser, not the simple-command parser that performed the
/// substitution.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Rec<T> {
    /// Result of alias substitution
    AliasSubstituted,
    /// Successful parse result
    Parsed(T),
}

impl<T> Rec<T> {
    /// Tests if `self` is `AliasSubstituted`.
    pub fn is_alias_substituted(&self) -> bool {
        matches!(self, Rec::AliasSubstituted)
    }

    /// Extracts the result of successful parsing.
    ///
    /// # Panics
    ///
    /// If `self` is `AliasSubstituted`.
    pub fn unwrap(self) -> T {
        match self {
            Rec::AliasSubstituted => panic!("Rec::AliasSubstituted cannot be unwrapped"),
            Rec::Parsed(v) => v,
        }
    }
}

/// Set of parameters for constructing a [`Parser`]
#[derive(Debug)]
#[must_use = "Config must be used to create a parser"]
pub struct Config<'a> {
    /// Aliases the parser substitutes into command words
    aliases: &'a dyn Glossary,
}

impl<'a> Config<'a> {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Config {
            aliases: &EmptyGlossary,
        }
    }

    /// Sets the glossary of aliases.
    #[inline]
    pub fn aliases(&mut self, aliases: &'a dyn Glossary) -> &mut Self {
        self.aliases = aliases;
        self
    }

    /// Creates a parser reading tokens from the given lexer.
    pub fn input(&self, lexer: &'a mut Lexer) -> Parser<'a> {
        Parser {
            lexer,
            aliases: self.aliases,
            token: None,
            unread_here_docs: Vec::new(),
        }
    }
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// The shell syntax parser
///
/// The parser borrows a [lexer](Lexer) and keeps at most one token of
/// lookahead. Here-documents found while parsing a line are remembered and
/// their contents are read when the newline token is consumed.
#[derive(Debug)]
#[must_use = "Parser must be used to parse syntax"]
pub struct Parser<'a> {
    /// Lexer providing tokens
    lexer: &'a mut Lexer,

    /// Aliases substituted into command words
    aliases: &'a dyn Glossary,

    /// Token to parse next
    token: Option<Token>,

    /// Here-documents whose contents have not been read yet
    unread_here_docs: Vec<Rc<HereDoc>>,
}

impl<'a> Parser<'a> {
    /// Creates a new configuration with default settings.
    ///
    /// This is a synonym for [`Config::new`]; create the parser by calling
    /// the configuration's [`input`](Config::input).
    #[inline(always)]
    pub fn config() -> Config<'a> {
        Config::new()
    }

    /// Creates a parser with default settings.
    pub fn new(lexer: &'a mut Lexer) -> Parser<'a> {
        Self::config().input(lexer)
    }

    /// Gives the grammar functions access to the lexer.
    ///
    /// Must not be used while a token is pending; see
    /// [`assert_no_pending_token`](Self::assert_no_pending_token).
    pub(super) fn lexer(&mut self) -> &mut Lexer {
        &mut *self.lexer
    }

    pub(super) fn assert_no_pending_token(&self) {
        assert!(self.token.is_none(), "there should be no pending token");
    }

    /// Reads the next token if none is pending.
    fn require_token(&mut self) -> Result<()> {
        if self.token.is_none() {
            self.lexer.skip_blanks_and_comment()?;
            self.token = Some(self.lexer.token()?);
        }
        Ok(())
    }

    /// Returns a reference to the current token, reading it first if
    /// needed.
    pub fn peek_token(&mut self) -> Result<&Token> {
        self.require_token()?;
        Ok(self.token.as_ref().unwrap())
    }

    /// Consumes the current token without performing alias substitution.
    ///
    /// Use this only where no alias substitution is expected; otherwise use
    /// [`take_token_manual`](Self::take_token_manual) or
    /// [`take_token_auto`](Self::take_token_auto).
    pub fn take_token_raw(&mut self) -> Result<Token> {
        self.require_token()?;
        Ok(self.token.take().unwrap())
    }

    /// Performs alias substitution on a just-taken token.
    fn substitute_alias(&mut self, token: Token, is_command_name: bool) -> Rec<Token> {
        if self.aliases.is_empty() {
            return Rec::Parsed(token);
        }
        let TokenId::Token(_) = token.id else {
            return Rec::Parsed(token);
        };
        let Some(name) = token.word.to_string_if_literal() else {
            return Rec::Parsed(token);
        };
        if token.word.location.code.source.is_alias_for(&name) {
            return Rec::Parsed(token);
        }
        let Some(alias) = self.aliases.look_up(&name) else {
            return Rec::Parsed(token);
        };
        if is_command_name
            || alias.global
            || self.lexer.is_after_blank_ending_alias(token.index)
        {
            self.lexer.substitute_alias(token.index, &alias);
            return Rec::AliasSubstituted;
        }
        Rec::Parsed(token)
    }

    /// Consumes the current token after performing applicable alias
    /// substitution.
    ///
    /// If the token named an alias, the substitution is performed and
    /// `Ok(Rec::AliasSubstituted)` returned without consuming any token.
    /// Alias substitution is not performed on reserved words; it is the
    /// caller's responsibility not to call this function when the token
    /// must be treated as a reserved word.
    pub fn take_token_manual(&mut self, is_command_name: bool) -> Result<Rec<Token>> {
        let token = self.take_token_raw()?;
        Ok(self.substitute_alias(token, is_command_name))
    }

    /// Consumes the current token, repeating alias substitution until a
    /// non-alias token is found.
    ///
    /// Keywords contained in `keywords` are returned without substitution.
    pub fn take_token_auto(&mut self, keywords: &[Keyword]) -> Result<Token> {
        loop {
            let token = self.take_token_raw()?;
            if let TokenId::Token(Some(keyword)) = token.id {
                if keywords.contains(&keyword) {
                    return Ok(token);
                }
            }
            if let Rec::Parsed(token) = self.substitute_alias(token, false) {
                return Ok(token);
            }
        }
    }

    /// Tests if a blank character separates the just-taken token from the
    /// next one.
    ///
    /// Must be called after taking a token and before peeking the next.
    pub fn has_blank(&mut self) -> Result<bool> {
        self.assert_no_pending_token();
        Ok(self.lexer.peek_char().is_some_and(is_blank))
    }

    /// Remembers a here-document operator whose content is to be read at
    /// the next newline.
    pub fn memorize_unread_here_doc(&mut self, here_doc: Rc<HereDoc>) {
        self.unread_here_docs.push(here_doc);
    }

    /// Reads the contents of all remembered here-documents.
    ///
    /// Must be called just after a newline token has been consumed. If a
    /// token has been peeked past the newline, this function panics, since
    /// the content lines would already have been consumed as tokens.
    pub fn here_doc_contents(&mut self) -> Result<()> {
        assert!(
            self.token.is_none(),
            "no token must be peeked before reading here-doc contents"
        );
        for here_doc in self.unread_here_docs.drain(..) {
            self.lexer.here_doc_content(&here_doc)?;
        }
        Ok(())
    }

    /// Ensures that there is no pending here-document.
    pub fn ensure_no_unread_here_doc(&self) -> Result<()> {
        match self.unread_here_docs.first() {
            None => Ok(()),
            Some(here_doc) => Err(Error {
                cause: SyntaxError::MissingHereDocContent.into(),
                location: here_doc.delimiter.location.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{Alias, AliasSet};
    use crate::parser::error::ErrorCause;
    use crate::source::{Location, Source};
    use assert_matches::assert_matches;

    fn alias_set(entries: &[(&str, &str, bool)]) -> AliasSet {
        let mut set = AliasSet::new();
        for &(name, replacement, global) in entries {
            set.insert(Alias {
                name: name.to_string(),
                replacement: replacement.to_string(),
                global,
                origin: Location::dummy(name),
            });
        }
        set
    }

    #[test]
    fn takes_tokens_in_order() {
        let mut lexer = Lexer::from_memory("one two", Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        assert_eq!(parser.take_token_raw().unwrap().to_string(), "one");
        assert_eq!(parser.take_token_raw().unwrap().to_string(), "two");
        assert_eq!(parser.take_token_raw().unwrap().id, TokenId::EndOfInput);
    }

    #[test]
    fn command_name_alias_is_substituted() {
        let aliases = alias_set(&[("X", "x", false)]);
        let mut lexer = Lexer::from_memory("X", Source::Unknown);
        let mut parser = Parser::config().aliases(&aliases).input(&mut lexer);

        let result = parser.take_token_manual(true).unwrap();
        assert_matches!(result, Rec::AliasSubstituted);

        let token = parser.take_token_manual(true).unwrap().unwrap();
        assert_eq!(token.to_string(), "x");
    }

    #[test]
    fn non_command_word_is_not_substituted() {
        let aliases = alias_set(&[("X", "x", false)]);
        let mut lexer = Lexer::from_memory("X", Source::Unknown);
        let mut parser = Parser::config().aliases(&aliases).input(&mut lexer);

        let token = parser.take_token_manual(false).unwrap().unwrap();
        assert_eq!(token.to_string(), "X");
    }

    #[test]
    fn global_alias_applies_anywhere() {
        let aliases = alias_set(&[("X", "x", true)]);
        let mut lexer = Lexer::from_memory("X", Source::Unknown);
        let mut parser = Parser::config().aliases(&aliases).input(&mut lexer);

        let result = parser.take_token_manual(false).unwrap();
        assert_matches!(result, Rec::AliasSubstituted);
    }

    #[test]
    fn recursion_on_own_name_is_stopped() {
        let aliases = alias_set(&[("X", "X y", false)]);
        let mut lexer = Lexer::from_memory("X", Source::Unknown);
        let mut parser = Parser::config().aliases(&aliases).input(&mut lexer);

        let result = parser.take_token_manual(true).unwrap();
        assert_matches!(result, Rec::AliasSubstituted);

        let token = parser.take_token_manual(true).unwrap().unwrap();
        assert_eq!(token.to_string(), "X");
    }

    #[test]
    fn blank_ending_alias_enables_next_substitution() {
        let aliases = alias_set(&[("X", "x ", false), ("Y", "y", false)]);
        let mut lexer = Lexer::from_memory("X Y", Source::Unknown);
        let mut parser = Parser::config().aliases(&aliases).input(&mut lexer);

        let result = parser.take_token_manual(true).unwrap();
        assert_matches!(result, Rec::AliasSubstituted);

        let token = parser.take_token_manual(true).unwrap().unwrap();
        assert_eq!(token.to_string(), "x");

        let result = parser.take_token_manual(false).unwrap();
        assert_matches!(result, Rec::AliasSubstituted);

        let token = parser.take_token_manual(false).unwrap().unwrap();
        assert_eq!(token.to_string(), "y");
    }

    #[test]
    fn keyword_in_list_is_not_substituted() {
        let aliases = alias_set(&[("if", "x", true)]);
        let mut lexer = Lexer::from_memory("if", Source::Unknown);
        let mut parser = Parser::config().aliases(&aliases).input(&mut lexer);

        let token = parser.take_token_auto(&[Keyword::If]).unwrap();
        assert_eq!(token.to_string(), "if");
    }

    #[test]
    fn here_doc_contents_read_in_order() {
        use std::cell::OnceCell;
        let mut lexer = Lexer::from_memory("1\nONE\n2\nTWO\nx", Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        let one = Rc::new(HereDoc {
            delimiter: "ONE".parse().unwrap(),
            remove_tabs: false,
            content: OnceCell::new(),
        });
        let two = Rc::new(HereDoc {
            delimiter: "TWO".parse().unwrap(),
            remove_tabs: false,
            content: OnceCell::new(),
        });
        parser.memorize_unread_here_doc(Rc::clone(&one));
        parser.memorize_unread_here_doc(Rc::clone(&two));
        parser.here_doc_contents().unwrap();
        assert_eq!(one.content.get().unwrap().to_string(), "1\n");
        assert_eq!(two.content.get().unwrap().to_string(), "2\n");
    }

    #[test]
    fn unread_here_doc_is_an_error() {
        use std::cell::OnceCell;
        let mut lexer = Lexer::from_memory("", Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        parser.ensure_no_unread_here_doc().unwrap();
        parser.memorize_unread_here_doc(Rc::new(HereDoc {
            delimiter: "EOF".parse().unwrap(),
            remove_tabs: false,
            content: OnceCell::new(),
        }));
        let error = parser.ensure_no_unread_here_doc().unwrap_err();
        assert_matches!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::MissingHereDocContent)
        );
    }
}
