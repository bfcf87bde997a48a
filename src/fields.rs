/// Fixed-width field extraction
///
/// A layout is an ordered list of `(name, width)` pairs. `Fields` slices a
/// message body along its catalog layout and hands each named slice to the
/// numeric codec, flag tables or identifier type that interprets it.

use crate::catalog::CatalogEntry;
use crate::codec::{NumericCodec, Price, Token};
use crate::decoder::{DecodeError, DecodeResult, FieldError};
use crate::flags::FlagTable;
use crate::protocol::Side;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub width: usize,
}

pub const fn field(name: &'static str, width: usize) -> Field {
    Field { name, width }
}

pub type Layout = &'static [Field];

/// Sum of all widths in a layout
pub const fn layout_width(layout: &[Field]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < layout.len() {
        total += layout[i].width;
        i += 1;
    }
    total
}

/// Byte range of a named field
pub fn locate(layout: &[Field], name: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for f in layout {
        if f.name == name {
            return Some((offset, f.width));
        }
        offset += f.width;
    }
    None
}

/// Split `body` into `(name, bytes)` pairs in layout order
///
/// Stops at the first field that does not fit entirely in `body`.
pub fn extract<'a>(
    layout: &'a [Field],
    body: &'a [u8],
) -> impl Iterator<Item = (&'static str, &'a [u8])> + 'a {
    layout.iter().scan(0usize, move |offset, f| {
        let bytes = body.get(*offset..*offset + f.width)?;
        *offset += f.width;
        Some((f.name, bytes))
    })
}

/// Typed view of one message body
pub struct Fields<'a, C> {
    entry: &'static CatalogEntry,
    body: &'a [u8],
    _codec: PhantomData<C>,
}

impl<'a, C: NumericCodec> Fields<'a, C> {
    /// Fails closed when the body is shorter than the layout
    pub fn new(entry: &'static CatalogEntry, body: &'a [u8]) -> DecodeResult<Self> {
        let need = entry.body_width();
        if body.len() < need {
            return Err(DecodeError::TruncatedMessage {
                kind: entry.name,
                need,
                have: body.len(),
            });
        }
        Ok(Fields {
            entry,
            body: &body[..need],
            _codec: PhantomData,
        })
    }

    pub fn entry(&self) -> &'static CatalogEntry {
        self.entry
    }

    pub fn has(&self, name: &str) -> bool {
        locate(self.entry.layout, name).is_some()
    }

    pub fn raw(&self, name: &'static str) -> DecodeResult<&'a [u8]> {
        let (offset, width) = locate(self.entry.layout, name)
            .ok_or_else(|| self.malformed(name, FieldError::NotInLayout))?;
        Ok(&self.body[offset..offset + width])
    }

    pub fn unsigned(&self, name: &'static str) -> DecodeResult<u64> {
        C::unsigned(self.raw(name)?).map_err(|e| self.malformed(name, e))
    }

    pub fn quantity(&self, name: &'static str) -> DecodeResult<u64> {
        C::quantity(self.raw(name)?).map_err(|e| self.malformed(name, e))
    }

    pub fn price(&self, name: &'static str) -> DecodeResult<Price> {
        C::price(self.raw(name)?).map_err(|e| self.malformed(name, e))
    }

    pub fn token(&self, name: &'static str) -> DecodeResult<Token> {
        Token::new(self.raw(name)?).map_err(|e| self.malformed(name, e))
    }

    /// Optional field: `None` when this layout does not carry it
    pub fn token_opt(&self, name: &'static str) -> DecodeResult<Option<Token>> {
        if self.has(name) {
            self.token(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Single-byte code
    pub fn code(&self, name: &'static str) -> DecodeResult<u8> {
        match self.raw(name)? {
            [b] => Ok(*b),
            other => Err(self.malformed(name, FieldError::Width(other.len()))),
        }
    }

    pub fn code_opt(&self, name: &'static str) -> DecodeResult<Option<u8>> {
        if self.has(name) {
            self.code(name).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn side(&self, name: &'static str) -> DecodeResult<Side> {
        let code = self.code(name)?;
        Side::from_code(code).ok_or_else(|| self.malformed(name, FieldError::InvalidSide(code)))
    }

    /// Single-byte code looked up in a flag table
    pub fn flag(&self, name: &'static str, table: &FlagTable) -> DecodeResult<u8> {
        self.code(name).map(|c| table.decode(c))
    }

    /// Multi-byte positional flag field
    pub fn flag_set<T>(
        &self,
        name: &'static str,
        decode: impl FnOnce(&[u8]) -> Result<T, FieldError>,
    ) -> DecodeResult<T> {
        decode(self.raw(name)?).map_err(|e| self.malformed(name, e))
    }

    pub fn malformed(&self, field: &'static str, reason: FieldError) -> DecodeError {
        DecodeError::MalformedField {
            kind: self.entry.name,
            field,
            reason,
        }
    }
}
