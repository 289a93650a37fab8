//! codec.rs
//! Binary encoding of an expression graph.
//!
//! A stream is `MAGIC | VERSION | record`, where a record is a one-byte tag
//! followed by its payload, written depth-first, root first:
//!
//! - `Sum` / `Mul`: the `lhs` record, then the `rhs` record
//! - `Const`: `f64`, little-endian
//! - `Var`: `u64` little-endian byte length, then the UTF-8 name
//!
//! Sharing is not represented: a subgraph reachable through several parents is
//! written once per parent and decodes into independent copies.
//!
//! Both directions walk the tree with an explicit stack, so graph depth is
//! bounded by memory and by `DecodeConfig::max_depth`, never by the thread stack.

use super::config::DecodeConfig;
use super::error::{CodecError, DecodeReason};
use super::types::{Tag, FORMAT_VERSION, HEADER_LEN, MAGIC};
use crate::graph::{Graph, Node};
use log::{debug, trace, warn};
use std::sync::Arc;

/// Encodes `graph`. Never fails.
pub fn serialize(graph: &Graph) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 16);
    out.extend_from_slice(&MAGIC);
    out.push(FORMAT_VERSION);

    let mut stack = vec![graph.root()];
    while let Some(node) = stack.pop() {
        out.push(Tag::of(node) as u8);
        match node {
            Node::Sum { lhs, rhs } | Node::Mul { lhs, rhs } => {
                // lhs is written first, so it goes on top.
                stack.push(rhs);
                stack.push(lhs);
            }
            Node::Const(value) => out.extend_from_slice(&value.to_le_bytes()),
            Node::Var(name) => {
                // usize is at most 64 bits on every supported target.
                out.extend_from_slice(&(name.len() as u64).to_le_bytes());
                out.extend_from_slice(name.as_bytes());
            }
        }
    }

    debug!("Serialized graph into {} bytes", out.len());
    out
}

/// Decodes a stream produced by [`serialize`] using the default limits.
pub fn deserialize(bytes: &[u8]) -> Result<Graph, CodecError> {
    deserialize_with(bytes, &DecodeConfig::default())
}

/// Decodes a stream under explicit limits. All-or-nothing: on error no part
/// of the graph survives.
pub fn deserialize_with(bytes: &[u8], config: &DecodeConfig) -> Result<Graph, CodecError> {
    let mut decoder = Decoder { bytes, pos: 0, config };
    let decoded = decoder.header().and_then(|()| decoder.tree()).and_then(|root| {
        decoder.finish()?;
        Ok(root)
    });

    match decoded {
        Ok(root) => {
            debug!("Deserialized graph from {} bytes", bytes.len());
            Ok(Graph::from_arc(root))
        }
        Err(e) => {
            warn!("Rejected graph stream: {e}");
            Err(e)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Operator {
    Sum,
    Mul,
}

/// An operator whose record has been read but whose operands are still pending.
struct OpenRecord {
    op: Operator,
    lhs: Option<Arc<Node>>,
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    config: &'a DecodeConfig,
}

impl<'a> Decoder<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let available = self.bytes.len() - self.pos;
        if n > available {
            return Err(CodecError::invalid(self.pos, DecodeReason::Truncated { needed: n, available }));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn header(&mut self) -> Result<(), CodecError> {
        if self.take_array::<4>()? != MAGIC {
            return Err(CodecError::invalid(0, DecodeReason::BadMagic));
        }
        let at = self.pos;
        let [version] = self.take_array::<1>()?;
        if version != FORMAT_VERSION {
            return Err(CodecError::invalid(
                at,
                DecodeReason::UnsupportedVersion { found: version, expected: FORMAT_VERSION },
            ));
        }
        Ok(())
    }

    /// Reads the root record and everything below it.
    ///
    /// Records arrive root first; `open` holds the chain of operators from the
    /// root down to the record being read. Each finished node is folded into
    /// its parent, completing parents bottom-up.
    fn tree(&mut self) -> Result<Arc<Node>, CodecError> {
        let mut open: Vec<OpenRecord> = Vec::new();

        loop {
            let at = self.pos;
            let depth = open.len() + 1;
            if depth > self.config.max_depth {
                return Err(CodecError::invalid(at, DecodeReason::DepthLimit(self.config.max_depth)));
            }

            let [byte] = self.take_array::<1>()?;
            let tag = Tag::try_from(byte).map_err(|b| CodecError::invalid(at, DecodeReason::UnknownTag(b)))?;
            trace!("Decoding {tag:?} at byte {at}");

            let mut node = match tag {
                Tag::Sum => {
                    open.push(OpenRecord { op: Operator::Sum, lhs: None });
                    continue;
                }
                Tag::Mul => {
                    open.push(OpenRecord { op: Operator::Mul, lhs: None });
                    continue;
                }
                Tag::Const => Arc::new(Node::Const(f64::from_le_bytes(self.take_array::<8>()?))),
                Tag::Var => Arc::new(Node::Var(self.name()?)),
            };

            loop {
                let Some(parent) = open.last_mut() else {
                    return Ok(node);
                };
                match parent.lhs.take() {
                    None => {
                        parent.lhs = Some(node);
                        break;
                    }
                    Some(lhs) => {
                        let op = parent.op;
                        open.pop();
                        node = Arc::new(match op {
                            Operator::Sum => Node::Sum { lhs, rhs: node },
                            Operator::Mul => Node::Mul { lhs, rhs: node },
                        });
                    }
                }
            }
        }
    }

    fn name(&mut self) -> Result<String, CodecError> {
        let at = self.pos;
        let len = u64::from_le_bytes(self.take_array::<8>()?);
        let limit = self.config.max_name_len;
        let len = usize::try_from(len)
            .ok()
            .filter(|&n| n <= limit)
            .ok_or_else(|| CodecError::invalid(at, DecodeReason::NameTooLong { len, limit }))?;
        let start = self.pos;
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| CodecError::invalid(start, DecodeReason::InvalidUtf8))
    }

    fn finish(&self) -> Result<(), CodecError> {
        let rest = self.bytes.len() - self.pos;
        if rest != 0 {
            return Err(CodecError::invalid(self.pos, DecodeReason::TrailingBytes(rest)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computation::Inputs;
    use crate::graph::{Const, Var};
    use rstest::rstest;

    fn sample() -> Graph {
        let x = Var::new("x");
        &x + Const(20.0) * &x
    }

    fn reason(bytes: &[u8]) -> DecodeReason {
        match deserialize(bytes) {
            Err(CodecError::InvalidEncoding { reason, .. }) => reason,
            Err(other) => panic!("Expected InvalidEncoding, got {other}"),
            Ok(g) => panic!("Expected an error, decoded {g}"),
        }
    }

    #[test]
    fn test_layout_of_a_small_graph() {
        let g = Var::new("x") + Const(2.0);
        let bytes = serialize(&g);

        let mut expected = b"CGAD\x01".to_vec();
        expected.push(Tag::Sum as u8);
        expected.push(Tag::Var as u8);
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.push(b'x');
        expected.push(Tag::Const as u8);
        expected.extend_from_slice(&2.0f64.to_le_bytes());

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_round_trip_preserves_evaluation() {
        let g = sample();
        let back = deserialize(&serialize(&g)).unwrap();
        let inputs: Inputs = [("x".to_string(), 2.0)].into_iter().collect();
        assert_eq!(back.eval(&inputs).unwrap(), 42.0);
        assert_eq!(back.to_string(), g.to_string());
    }

    #[test]
    fn test_sharing_is_expanded_on_decode() {
        let a = Var::new("x") + Const(1.0);
        let g = &a * &a;
        let back = deserialize(&serialize(&g)).unwrap();

        assert_eq!(g.stats().distinct_nodes, 4);
        let s = back.stats();
        assert_eq!(s.distinct_nodes, 7);
        assert_eq!(s.tree_nodes, g.stats().tree_nodes);
    }

    #[test]
    fn test_every_strict_prefix_is_rejected() {
        let bytes = serialize(&sample());
        for cut in 0..bytes.len() {
            match deserialize(&bytes[..cut]) {
                Err(CodecError::InvalidEncoding { .. }) => {}
                other => panic!("prefix of {cut} bytes: expected InvalidEncoding, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_truncated_const_reports_shortfall() {
        let mut bytes = b"CGAD\x01".to_vec();
        bytes.push(Tag::Const as u8);
        bytes.extend_from_slice(&[0, 0, 0]);
        assert_eq!(reason(&bytes), DecodeReason::Truncated { needed: 8, available: 3 });
    }

    #[rstest]
    #[case::empty(b"", DecodeReason::Truncated { needed: 4, available: 0 })]
    #[case::bad_magic(b"PB\x00\x00\x01\x02", DecodeReason::BadMagic)]
    #[case::newer_version(b"CGAD\x02\x02", DecodeReason::UnsupportedVersion { found: 2, expected: 1 })]
    #[case::unknown_tag(b"CGAD\x01\x07", DecodeReason::UnknownTag(7))]
    #[case::missing_root(b"CGAD\x01", DecodeReason::Truncated { needed: 1, available: 0 })]
    #[case::bad_utf8(b"CGAD\x01\x03\x01\x00\x00\x00\x00\x00\x00\x00\xff", DecodeReason::InvalidUtf8)]
    fn test_malformed_streams(#[case] bytes: &[u8], #[case] expected: DecodeReason) {
        assert_eq!(reason(bytes), expected);
    }

    #[test]
    fn test_unknown_tag_in_nested_operand_aborts_whole_decode() {
        let mut bytes = serialize(&sample());
        // Corrupt the tag of the rhs `Mul` (after header, Sum tag, Var "x").
        let rhs_tag = HEADER_LEN + 1 + 1 + 8 + 1;
        assert_eq!(bytes[rhs_tag], Tag::Mul as u8);
        bytes[rhs_tag] = 9;
        assert_eq!(
            deserialize(&bytes).unwrap_err().reason(),
            Some(&DecodeReason::UnknownTag(9))
        );
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let mut bytes = serialize(&sample());
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(reason(&bytes), DecodeReason::TrailingBytes(2));
    }

    #[test]
    fn test_depth_limit() {
        let x = Var::new("x");
        let mut g: Graph = (&x).into();
        for _ in 0..9 {
            g = &g * &x;
        }
        let bytes = serialize(&g);
        assert_eq!(g.stats().depth, 10);

        let tight = DecodeConfig::default().with_max_depth(9);
        let err = deserialize_with(&bytes, &tight).unwrap_err();
        assert_eq!(err.reason(), Some(&DecodeReason::DepthLimit(9)));

        let exact = DecodeConfig::default().with_max_depth(10);
        assert!(deserialize_with(&bytes, &exact).is_ok());
    }

    /// A left-leaning chain of `Sum`s whose deepest leaf sits at `depth`.
    fn nested_sums(depth: usize) -> Vec<u8> {
        let mut bytes = b"CGAD\x01".to_vec();
        bytes.extend(std::iter::repeat(Tag::Sum as u8).take(depth - 1));
        for _ in 0..depth {
            bytes.push(Tag::Const as u8);
            bytes.extend_from_slice(&1.0f64.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_nesting_at_default_limit_decodes() {
        let bytes = nested_sums(DecodeConfig::DEFAULT_MAX_DEPTH);
        let g = deserialize(&bytes).unwrap();
        assert!(matches!(g.root(), Node::Sum { .. }));
        assert_eq!(serialize(&g), bytes);
    }

    #[test]
    fn test_nesting_past_default_limit_is_rejected() {
        let bytes = nested_sums(DecodeConfig::DEFAULT_MAX_DEPTH + 1);
        assert_eq!(reason(&bytes), DecodeReason::DepthLimit(DecodeConfig::DEFAULT_MAX_DEPTH));
    }

    #[test]
    fn test_truncated_deep_stream_is_rejected() {
        let bytes = nested_sums(DecodeConfig::DEFAULT_MAX_DEPTH);
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(reason(cut), DecodeReason::Truncated { needed: 8, available: 5 });
    }

    #[test]
    fn test_raised_limit_decodes_very_deep_streams() {
        let depth = 200_000;
        let bytes = nested_sums(depth);
        let cfg = DecodeConfig::default().with_max_depth(depth);
        let g = deserialize_with(&bytes, &cfg).unwrap();
        assert_eq!(serialize(&g), bytes);
    }

    #[test]
    fn test_name_length_limit() {
        let g = Graph::variable("a_rather_long_name");
        let cfg = DecodeConfig::default().with_max_name_len(4);
        let err = deserialize_with(&serialize(&g), &cfg).unwrap_err();
        assert_eq!(err.reason(), Some(&DecodeReason::NameTooLong { len: 18, limit: 4 }));
    }

    #[test]
    fn test_special_floats_survive() {
        let g = Const(f64::NEG_INFINITY) + Const(-0.0);
        let back = deserialize(&serialize(&g)).unwrap();
        assert_eq!(back.root(), g.root());

        let nan = deserialize(&serialize(&Graph::constant(f64::NAN))).unwrap();
        assert!(nan.eval(&Inputs::new()).unwrap().is_nan());
    }

    #[test]
    fn test_unicode_names() {
        let g = Var::new("θ₁") * Var::new("λ");
        let back = deserialize(&serialize(&g)).unwrap();
        assert_eq!(back.variables(), g.variables());
    }
}
