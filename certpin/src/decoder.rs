//! Cursor over a tree of DER elements.
//!
//! The length of each element is decoded by the [`der`] crate. Identifiers are decoded here,
//! so that elements of any type can be walked, including universal types the [`der`] crate
//! does not know, such as `UniversalString`. This module only tracks where we are in the tree:
//! a stack of frames, each one being a slice of bytes and a read position in it.
//!
//! - [`Decoder::start`] resets the stack to a single frame over the given bytes.
//! - [`Decoder::enter`] moves the cursor of the current frame past a constructed element, and
//!   pushes a new frame over the contents of this element.
//! - [`Decoder::leave`] pops the current frame. The cursor of the parent frame is left untouched,
//!   so reading resumes right after the element that was entered.
use std::fmt;

use der::{Class, Decode, Length, Reader, SliceReader, Tag};

/// Identifier of an element: class, constructed bit and tag number.
///
/// Unlike [`Tag`], any identifier can be represented.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    /// Class of the tag.
    pub class: Class,

    /// Whether the contents of the element are themselves DER elements.
    pub constructed: bool,

    /// Tag number.
    pub number: u32,
}

impl Identifier {
    /// Identifier of a primitive element of the universal class.
    #[must_use]
    pub const fn universal(number: u32) -> Self {
        Self {
            class: Class::Universal,
            constructed: false,
            number,
        }
    }

    /// Equivalent [`Tag`], if the [`der`] crate knows this type.
    #[must_use]
    pub fn tag(self) -> Option<Tag> {
        let number = u8::try_from(self.number).ok().filter(|n| *n < 0x1F)?;
        let class = match self.class {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::ContextSpecific => 0x80,
            Class::Private => 0xC0,
        };
        let constructed = if self.constructed { 0x20 } else { 0x00 };
        Tag::try_from(class | constructed | number).ok()
    }

    fn decode(reader: &mut SliceReader<'_>) -> Result<Self, DecodeError> {
        let first = reader.read_byte()?;
        let class = match first >> 6 {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::ContextSpecific,
            _ => Class::Private,
        };
        let constructed = first & 0x20 != 0;

        let mut number = u32::from(first & 0x1F);
        if number == 0x1F {
            // High tag number form: groups of 7 bits, most significant first.
            number = 0;
            loop {
                let byte = reader.read_byte()?;
                if number == 0 && byte == 0x80 {
                    return Err(DecodeError::InvalidIdentifier);
                }
                if number > u32::MAX >> 7 {
                    return Err(DecodeError::InvalidIdentifier);
                }
                number = (number << 7) | u32::from(byte & 0x7F);
                if byte & 0x80 == 0 {
                    break;
                }
            }
            if number < 0x1F {
                return Err(DecodeError::InvalidIdentifier);
            }
        }

        Ok(Self {
            class,
            constructed,
            number,
        })
    }
}

impl From<Tag> for Identifier {
    fn from(tag: Tag) -> Self {
        Self {
            class: tag.class(),
            constructed: tag.is_constructed(),
            number: u32::from(tag.number().value()),
        }
    }
}

impl PartialEq<Tag> for Identifier {
    fn eq(&self, other: &Tag) -> bool {
        *self == Self::from(*other)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = self.tag() {
            return write!(f, "{tag}");
        }
        let class = match self.class {
            Class::Universal => "UNIVERSAL",
            Class::Application => "APPLICATION",
            Class::ContextSpecific => "CONTEXT-SPECIFIC",
            Class::Private => "PRIVATE",
        };
        write!(f, "[{class} {}]", self.number)?;
        if self.constructed {
            write!(f, " (constructed)")?;
        }
        Ok(())
    }
}

/// A single element read from the decoder.
///
/// The value borrows the buffer given to [`Decoder::start`]. For a constructed element, it
/// contains the encoding of its children, and can be given back to [`Decoder::start`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tlv<'a> {
    /// Identifier of the element.
    pub tag: Identifier,

    /// Contents of the element, without the identifier and length.
    pub value: &'a [u8],
}

#[derive(Copy, Clone, Debug)]
struct Frame<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Frame<'a> {
    fn remaining(&self) -> &'a [u8] {
        let bytes: &'a [u8] = self.bytes;
        bytes.get(self.pos..).unwrap_or_default()
    }
}

/// Stateful cursor over DER encoded bytes.
#[derive(Clone, Debug, Default)]
pub struct Decoder<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> Decoder<'a> {
    /// Create a decoder positioned at the start of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        let mut this = Self::default();
        this.start(bytes);
        this
    }

    /// Reset the decoder to read `bytes` from the beginning.
    ///
    /// Any scope entered previously is discarded.
    pub fn start(&mut self, bytes: &'a [u8]) {
        self.frames.clear();
        self.frames.push(Frame { bytes, pos: 0 });
    }

    /// Returns true if all elements of the current scope have been read.
    #[must_use]
    pub fn eof(&self) -> bool {
        match self.frames.last() {
            Some(frame) => frame.remaining().is_empty(),
            None => true,
        }
    }

    /// Number of scopes entered from the root of the decoder.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Return the identifier of the next element, without moving the cursor.
    ///
    /// # Errors
    ///
    /// Fails if the current scope is exhausted or if the identifier is invalid.
    pub fn peek(&self) -> Result<Identifier, DecodeError> {
        let frame = self.frames.last().ok_or(DecodeError::EndOfContents)?;
        let mut reader = Self::reader(frame)?;
        Identifier::decode(&mut reader)
    }

    /// Read the next element of the current scope, and move past it.
    ///
    /// # Errors
    ///
    /// Fails if the current scope is exhausted, or if the element is not properly encoded
    /// (truncated, invalid identifier or length).
    pub fn read(&mut self) -> Result<Tlv<'a>, DecodeError> {
        let frame = self.frames.last_mut().ok_or(DecodeError::EndOfContents)?;
        let mut reader = Self::reader(frame)?;

        let tag = Identifier::decode(&mut reader)?;
        let length = Length::decode(&mut reader)?;
        let value = reader.read_slice(length)?;
        let consumed = usize::try_from(reader.position())?;
        frame.pos += consumed;

        Ok(Tlv { tag, value })
    }

    /// Enter the next element, which must be constructed.
    ///
    /// Following reads will return the children of this element, until [`Decoder::leave`] is
    /// called. The identifier of the entered element is returned.
    ///
    /// # Errors
    ///
    /// Fails if the current scope is exhausted, if the next element is not properly encoded,
    /// or if it is a primitive element.
    pub fn enter(&mut self) -> Result<Identifier, DecodeError> {
        let tag = self.peek()?;
        if !tag.constructed {
            return Err(DecodeError::NotConstructed(tag));
        }
        let tlv = self.read()?;
        self.frames.push(Frame {
            bytes: tlv.value,
            pos: 0,
        });
        Ok(tlv.tag)
    }

    /// Leave the scope entered by the last call to [`Decoder::enter`].
    ///
    /// Elements of the scope that were not read are skipped.
    ///
    /// # Errors
    ///
    /// Fails if no scope was entered since the last call to [`Decoder::start`].
    pub fn leave(&mut self) -> Result<(), DecodeError> {
        if self.frames.len() <= 1 {
            return Err(DecodeError::NoEnclosingScope);
        }
        let _ = self.frames.pop();
        Ok(())
    }

    fn reader(frame: &Frame<'a>) -> Result<SliceReader<'a>, DecodeError> {
        let remaining = frame.remaining();
        if remaining.is_empty() {
            return Err(DecodeError::EndOfContents);
        }
        Ok(SliceReader::new(remaining)?)
    }
}

/// Error while walking DER elements with a [`Decoder`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// All the elements of the current scope have already been read.
    EndOfContents,

    /// The element to enter is primitive.
    NotConstructed(Identifier),

    /// The identifier uses the high tag number form with a non minimal encoding, or a tag
    /// number too big to be represented.
    InvalidIdentifier,

    /// [`Decoder::leave`] was called without a matching [`Decoder::enter`].
    NoEnclosingScope,

    /// The element is not properly encoded.
    Der(der::Error),
}

impl From<der::Error> for DecodeError {
    fn from(err: der::Error) -> Self {
        Self::Der(err)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfContents => write!(f, "unexpected end of contents"),
            Self::NotConstructed(tag) => write!(f, "cannot enter primitive element {tag}"),
            Self::InvalidIdentifier => write!(f, "invalid identifier"),
            Self::NoEnclosingScope => write!(f, "no scope to leave"),
            Self::Der(err) => write!(f, "invalid DER encoding: {err}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Der(err) => Some(err),
            _ => None,
        }
    }
}
