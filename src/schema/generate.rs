//! # Codec Generation
//!
//! Compiles a [`PacketDefinition`] into a fixed serialize/deserialize
//! procedure pair, once per packet type, ahead of any traffic.
//!
//! For each field shape an ordered chain of shape-recognizers is consulted;
//! the first recognizer whose `should_handle` returns true owns the field and
//! contributes its two fragments: one appends the field's wire form to the
//! output token buffer, one consumes the next token(s) and produces the
//! field's value. Recognizers for the known primitive shapes emit fragments
//! with direct parse/format calls and no lookup at call time; the final
//! catch-all recognizer (`should_handle` always true, ordered last) defers to
//! the converter repository through the field's type descriptor, which is the
//! extension point for enums and consumer-defined types.
//!
//! Shared parse helpers (the boolean encoding, integer range checks) live
//! once in [`crate::convert::scalar`] and are called by every fragment rather
//! than duplicated per field. Fragments perform no shape dispatch at call
//! time; that is the performance rationale for the two-tier design.

use std::sync::Arc;

use crate::convert::ConverterRegistry;
use crate::error::{constants, ProtocolError, Result};
use crate::wire::{TokenBuffer, Tokenizer, NULL_TOKEN};

use super::value::FieldValue;
use super::{FieldSpec, ListLen, PacketDefinition, ValueShape};

/// Call-scoped context handed to every fragment. Carries the frozen
/// converter repository for the catch-all tier.
pub struct CodecCx<'a> {
    pub converters: &'a ConverterRegistry,
}

type WriteFn = Box<dyn Fn(&CodecCx<'_>, &FieldValue, &mut TokenBuffer) -> Result<()> + Send + Sync>;
type ReadFn = Box<dyn Fn(&CodecCx<'_>, &mut Tokenizer<'_>) -> Result<FieldValue> + Send + Sync>;

/// The fragment pair generated for one top-level field.
pub struct FieldCodec {
    write: WriteFn,
    read: ReadFn,
}

type ElemWriteFn = Box<dyn Fn(&CodecCx<'_>, &FieldValue) -> Result<String> + Send + Sync>;
type ElemReadFn = Box<dyn Fn(&CodecCx<'_>, &str) -> Result<FieldValue> + Send + Sync>;

/// The fragment pair for one occurrence of a shape at the string level: one
/// element of a list, one sub-field of a record, or one top-level token.
pub struct ElementCodec {
    write: ElemWriteFn,
    read: ElemReadFn,
}

impl FieldCodec {
    /// Bridge an element codec to the token level: one element, one token.
    fn from_element(element: ElementCodec) -> Self {
        let ElementCodec { write, read } = element;
        FieldCodec {
            write: Box::new(move |cx, value, out| {
                out.push(write(cx, value)?);
                Ok(())
            }),
            read: Box::new(move |cx, tokens| {
                let token = tokens.next_token()?;
                read(cx, token.text)
            }),
        }
    }
}

/// One recognizer in the generation chain.
///
/// `build_element` produces the string-level fragments for shapes that can
/// nest; `build_field` produces the token-level fragments and defaults to the
/// one-token bridge. Only the list recognizer overrides it, because a fixed
/// list whose separator equals the packet separator spreads over several
/// top-level tokens.
pub trait ShapeRecognizer: Send + Sync {
    /// Recognizer identity for diagnostics.
    fn name(&self) -> &'static str;

    fn should_handle(&self, shape: &ValueShape) -> bool;

    fn build_element(
        &self,
        chain: &RecognizerChain,
        shape: &ValueShape,
        inner_separator: char,
    ) -> Result<ElementCodec>;

    fn build_field(
        &self,
        chain: &RecognizerChain,
        definition: &PacketDefinition,
        spec: &FieldSpec,
    ) -> Result<FieldCodec> {
        let _ = definition;
        let element = self.build_element(chain, &spec.shape, spec.inner_separator)?;
        Ok(FieldCodec::from_element(element))
    }
}

fn value_mismatch(recognizer: &str, got: &FieldValue) -> ProtocolError {
    ProtocolError::Definition(format!(
        "{}: {recognizer} fragment received a {} value",
        constants::ERR_SHAPE_MISMATCH,
        got.kind_name()
    ))
}

fn wrong_shape(recognizer: &'static str, shape: &ValueShape) -> ProtocolError {
    ProtocolError::Definition(format!(
        "recognizer `{recognizer}` cannot build a {} shape",
        shape.kind_name()
    ))
}

struct ScalarRecognizer;

impl ShapeRecognizer for ScalarRecognizer {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn should_handle(&self, shape: &ValueShape) -> bool {
        matches!(shape, ValueShape::Scalar(_))
    }

    fn build_element(&self, _: &RecognizerChain, shape: &ValueShape, _: char) -> Result<ElementCodec> {
        let ValueShape::Scalar(kind) = shape else {
            return Err(wrong_shape(self.name(), shape));
        };
        let kind = *kind;
        Ok(ElementCodec {
            write: Box::new(move |_cx, value| match value {
                FieldValue::Scalar(scalar) => Ok(scalar.render()),
                other => Err(value_mismatch("scalar", other)),
            }),
            read: Box::new(move |_cx, text| kind.parse(text).map(FieldValue::Scalar)),
        })
    }
}

struct NullableScalarRecognizer;

impl ShapeRecognizer for NullableScalarRecognizer {
    fn name(&self) -> &'static str {
        "nullable-scalar"
    }

    fn should_handle(&self, shape: &ValueShape) -> bool {
        matches!(shape, ValueShape::NullableScalar(_))
    }

    fn build_element(&self, _: &RecognizerChain, shape: &ValueShape, _: char) -> Result<ElementCodec> {
        let ValueShape::NullableScalar(kind) = shape else {
            return Err(wrong_shape(self.name(), shape));
        };
        let kind = *kind;
        Ok(ElementCodec {
            write: Box::new(move |_cx, value| match value {
                FieldValue::Nullable(None) => Ok(NULL_TOKEN.to_string()),
                FieldValue::Nullable(Some(scalar)) => Ok(scalar.render()),
                other => Err(value_mismatch("nullable-scalar", other)),
            }),
            read: Box::new(move |_cx, text| {
                if text == NULL_TOKEN {
                    Ok(FieldValue::Nullable(None))
                } else {
                    kind.parse(text).map(|s| FieldValue::Nullable(Some(s)))
                }
            }),
        })
    }
}

struct ListRecognizer;

impl ShapeRecognizer for ListRecognizer {
    fn name(&self) -> &'static str {
        "list"
    }

    fn should_handle(&self, shape: &ValueShape) -> bool {
        matches!(shape, ValueShape::List { .. })
    }

    fn build_element(&self, _: &RecognizerChain, shape: &ValueShape, _: char) -> Result<ElementCodec> {
        Err(ProtocolError::Definition(format!(
            "a {} field cannot nest inside another list or record",
            shape.kind_name()
        )))
    }

    fn build_field(
        &self,
        chain: &RecognizerChain,
        definition: &PacketDefinition,
        spec: &FieldSpec,
    ) -> Result<FieldCodec> {
        let ValueShape::List { element, len } = &spec.shape else {
            return Err(wrong_shape(self.name(), &spec.shape));
        };
        let element = Arc::new(chain.element_codec(element, spec.inner_separator)?);
        let len = *len;
        let list_separator = spec.list_separator;
        // A fixed list whose separator is the packet separator spreads over
        // n top-level tokens instead of sharing one.
        let spread = matches!(len, ListLen::Fixed(_)) && list_separator == definition.separator;
        let field_name = spec.name;

        let write_element = element.clone();
        let write: WriteFn = Box::new(move |cx, value, out| {
            let FieldValue::List(items) = value else {
                return Err(value_mismatch("list", value));
            };
            if let ListLen::Fixed(expected) = len {
                if items.len() != expected {
                    return Err(ProtocolError::Definition(format!(
                        "{}: `{field_name}` declares {expected} elements, instance holds {}",
                        constants::ERR_FIXED_LIST_ARITY,
                        items.len()
                    )));
                }
            }
            if spread {
                for item in items {
                    out.push((write_element.write)(cx, item)?);
                }
            } else {
                let rendered = items
                    .iter()
                    .map(|item| (write_element.write)(cx, item))
                    .collect::<Result<Vec<_>>>()?;
                let mut sep = [0u8; 4];
                out.push(rendered.join(list_separator.encode_utf8(&mut sep)));
            }
            Ok(())
        });

        let read: ReadFn = Box::new(move |cx, tokens| {
            let mut items = Vec::new();
            match len {
                ListLen::Fixed(count) if spread => {
                    for _ in 0..count {
                        let token = tokens.next_token()?;
                        items.push((element.read)(cx, token.text)?);
                    }
                }
                ListLen::Fixed(count) => {
                    let token = tokens.next_token()?;
                    // A zero-length fixed list serializes to one empty token.
                    if count > 0 || !token.text.is_empty() {
                        let mut sub = tokens.sub_tokenize(token, list_separator);
                        for _ in 0..count {
                            let elem = sub.next_token()?;
                            items.push((element.read)(cx, elem.text)?);
                        }
                        if !sub.is_exhausted() {
                            return Err(ProtocolError::CouldNotConvert {
                                token: token.text.to_string(),
                                converter: format!("fixed-list({count})"),
                            });
                        }
                    }
                }
                ListLen::Delimited => {
                    let token = tokens.next_token()?;
                    if !token.text.is_empty() {
                        let sub = tokens.sub_tokenize(token, list_separator);
                        for elem in sub {
                            items.push((element.read)(cx, elem.text)?);
                        }
                    }
                }
            }
            Ok(FieldValue::List(items))
        });

        Ok(FieldCodec { write, read })
    }
}

struct RecordRecognizer;

impl ShapeRecognizer for RecordRecognizer {
    fn name(&self) -> &'static str {
        "record"
    }

    fn should_handle(&self, shape: &ValueShape) -> bool {
        matches!(shape, ValueShape::Record(_))
    }

    fn build_element(
        &self,
        chain: &RecognizerChain,
        shape: &ValueShape,
        inner_separator: char,
    ) -> Result<ElementCodec> {
        let ValueShape::Record(def) = shape else {
            return Err(wrong_shape(self.name(), shape));
        };
        let def: &'static super::RecordDef = *def;
        let record_name = def.name;
        let fields: Arc<Vec<(&'static FieldSpec, ElementCodec)>> = Arc::new(
            def.fields
                .iter()
                .map(|spec| {
                    let codec = chain.element_codec(&spec.shape, spec.inner_separator)?;
                    Ok((spec, codec))
                })
                .collect::<Result<Vec<_>>>()?,
        );

        let write_fields = fields.clone();
        let write: ElemWriteFn = Box::new(move |cx, value| {
            let FieldValue::Record(values) = value else {
                return Err(value_mismatch("record", value));
            };
            if values.len() != write_fields.len() {
                return Err(ProtocolError::Definition(format!(
                    "{}: record `{record_name}` declares {} fields, value holds {}",
                    constants::ERR_SHAPE_MISMATCH,
                    write_fields.len(),
                    values.len()
                )));
            }
            let mut rendered = Vec::with_capacity(values.len());
            for ((spec, codec), value) in write_fields.iter().zip(values) {
                let text = (codec.write)(cx, value)
                    .map_err(|e| e.in_field(record_name, spec.name, spec.index))?;
                rendered.push(text);
            }
            let mut sep = [0u8; 4];
            Ok(rendered.join(inner_separator.encode_utf8(&mut sep)))
        });

        let read: ElemReadFn = Box::new(move |cx, text| {
            let mut sub = Tokenizer::new(text, inner_separator);
            let mut values = Vec::with_capacity(fields.len());
            for (spec, codec) in fields.iter() {
                let token = sub
                    .next_token()
                    .and_then(|token| (codec.read)(cx, token.text))
                    .map_err(|e| e.in_field(record_name, spec.name, spec.index))?;
                values.push(token);
            }
            // Trailing sub-tokens beyond the declared fields are ignored for
            // forward compatibility with extended records.
            Ok(FieldValue::Record(values))
        });

        Ok(ElementCodec { write, read })
    }
}

/// The catch-all tier. `should_handle` is always true so it terminates the
/// chain; it defers to the converter repository through the shape's type
/// descriptor at call time.
struct RegisteredRecognizer;

impl ShapeRecognizer for RegisteredRecognizer {
    fn name(&self) -> &'static str {
        "registered"
    }

    fn should_handle(&self, _shape: &ValueShape) -> bool {
        true
    }

    fn build_element(&self, _: &RecognizerChain, shape: &ValueShape, _: char) -> Result<ElementCodec> {
        let ValueShape::Registered(descriptor) = shape else {
            return Err(ProtocolError::Definition(format!(
                "no recognizer produced a codec for a {} shape",
                shape.kind_name()
            )));
        };
        let descriptor = *descriptor;
        Ok(ElementCodec {
            write: Box::new(move |cx, value| {
                let converter = cx.converters.resolve_dyn(&descriptor)?;
                match value {
                    FieldValue::Registered(boxed) => converter.serialize_any(boxed.as_ref()),
                    other => Err(value_mismatch("registered", other)),
                }
            }),
            read: Box::new(move |cx, text| {
                let converter = cx.converters.resolve_dyn(&descriptor)?;
                converter.deserialize_any(text).map(FieldValue::Registered)
            }),
        })
    }
}

/// The ordered recognizer chain, consulted once per field at build time.
pub struct RecognizerChain {
    recognizers: Vec<Box<dyn ShapeRecognizer>>,
}

impl Default for RecognizerChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecognizerChain {
    /// The built-in chain: scalar, nullable scalar, list, record, then the
    /// catch-all registered-type recognizer.
    pub fn standard() -> Self {
        Self {
            recognizers: vec![
                Box::new(ScalarRecognizer),
                Box::new(NullableScalarRecognizer),
                Box::new(ListRecognizer),
                Box::new(RecordRecognizer),
                Box::new(RegisteredRecognizer),
            ],
        }
    }

    fn recognizer_for(&self, shape: &ValueShape) -> &dyn ShapeRecognizer {
        // The catch-all makes this infallible.
        self.recognizers
            .iter()
            .find(|r| r.should_handle(shape))
            .map(AsRef::as_ref)
            .unwrap_or_else(|| self.recognizers[self.recognizers.len() - 1].as_ref())
    }

    /// Build the string-level codec for one occurrence of a shape.
    pub fn element_codec(&self, shape: &ValueShape, inner_separator: char) -> Result<ElementCodec> {
        self.recognizer_for(shape)
            .build_element(self, shape, inner_separator)
    }

    /// Build the token-level codec for one top-level field.
    pub fn field_codec(&self, definition: &PacketDefinition, spec: &FieldSpec) -> Result<FieldCodec> {
        self.recognizer_for(&spec.shape)
            .build_field(self, definition, spec)
    }

    /// Validate a definition and compile its procedure pair.
    pub fn generate(&self, definition: &'static PacketDefinition) -> Result<GeneratedCodec> {
        definition.validate()?;
        let fields = definition
            .fields
            .iter()
            .map(|spec| {
                Ok(BoundField {
                    name: spec.name,
                    index: spec.index,
                    codec: self.field_codec(definition, spec)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(GeneratedCodec { definition, fields })
    }
}

struct BoundField {
    name: &'static str,
    index: u16,
    codec: FieldCodec,
}

/// The fixed serialize/deserialize procedure pair for one packet type.
///
/// Serialization walks the fragments in field-index order, appending tokens;
/// deserialization consumes the tokenizer in the same order. Any fragment
/// failure is tagged with the failing field and aborts the whole call; no
/// partial result is ever produced.
pub struct GeneratedCodec {
    definition: &'static PacketDefinition,
    fields: Vec<BoundField>,
}

impl GeneratedCodec {
    pub fn definition(&self) -> &'static PacketDefinition {
        self.definition
    }

    /// Assemble the wire string for one packet's field values, given in
    /// index order.
    pub fn serialize(&self, values: &[FieldValue], cx: &CodecCx<'_>) -> Result<String> {
        if values.len() != self.fields.len() {
            return Err(ProtocolError::Definition(format!(
                "{}: packet `{}` declares {} fields, instance holds {}",
                constants::ERR_SHAPE_MISMATCH,
                self.definition.header,
                self.fields.len(),
                values.len()
            )));
        }
        let mut out = TokenBuffer::with_capacity(self.fields.len());
        for (field, value) in self.fields.iter().zip(values) {
            (field.codec.write)(cx, value, &mut out)
                .map_err(|e| e.in_field(self.definition.header, field.name, field.index))?;
        }
        Ok(out.join_with_header(self.definition.header, self.definition.separator))
    }

    /// Consume the token stream (positioned after the header) and produce
    /// the field values in index order.
    pub fn deserialize(&self, tokens: &mut Tokenizer<'_>, cx: &CodecCx<'_>) -> Result<Vec<FieldValue>> {
        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = (field.codec.read)(cx, tokens)
                .map_err(|e| e.in_field(self.definition.header, field.name, field.index))?;
            values.push(value);
        }
        Ok(values)
    }
}

impl std::fmt::Debug for GeneratedCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedCodec")
            .field("header", &self.definition.header)
            .field("fields", &self.fields.len())
            .finish()
    }
}
