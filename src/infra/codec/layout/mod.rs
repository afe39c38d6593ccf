//! Descriptor-driven access to fixed payload templates.
//! Each payload record declares its fields as [`FieldDescriptor`]s; the
//! reader/writer below are the only code that turns those descriptors into
//! byte offsets, so the layout table stays the single source of truth for
//! builders and test fixtures alike.
use crate::core::{FieldDescriptor, FieldKind};
use crate::error::LayoutError;

/// Check that `desc` has the expected kind and fits into `available` bytes.
fn check(desc: &FieldDescriptor, expected: FieldKind, available: usize) -> Result<(), LayoutError> {
    if desc.kind != expected {
        return Err(LayoutError::KindMismatch { field: desc.id });
    }
    if desc.end() > available {
        return Err(LayoutError::OutOfBounds {
            field: desc.id,
            end: desc.end(),
            available,
        });
    }
    Ok(())
}

//==================================================================================LAYOUT_READER
/// Reads typed fields out of a payload slice without copying it.
pub struct LayoutReader<'a> {
    buffer: &'a [u8],
}

impl<'a> LayoutReader<'a> {
    /// Wrap a payload slice.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    pub fn u8(&self, desc: &FieldDescriptor) -> Result<u8, LayoutError> {
        check(desc, FieldKind::U8, self.buffer.len())?;
        Ok(self.buffer[desc.offset])
    }

    pub fn u16(&self, desc: &FieldDescriptor) -> Result<u16, LayoutError> {
        check(desc, FieldKind::U16Le, self.buffer.len())?;
        Ok(u16::from_le_bytes(self.array::<2>(desc.offset)))
    }

    pub fn i16(&self, desc: &FieldDescriptor) -> Result<i16, LayoutError> {
        check(desc, FieldKind::I16Le, self.buffer.len())?;
        Ok(i16::from_le_bytes(self.array::<2>(desc.offset)))
    }

    pub fn u32(&self, desc: &FieldDescriptor) -> Result<u32, LayoutError> {
        check(desc, FieldKind::U32Le, self.buffer.len())?;
        Ok(u32::from_le_bytes(self.array::<4>(desc.offset)))
    }

    pub fn i32(&self, desc: &FieldDescriptor) -> Result<i32, LayoutError> {
        check(desc, FieldKind::I32Le, self.buffer.len())?;
        Ok(i32::from_le_bytes(self.array::<4>(desc.offset)))
    }

    /// Borrow the byte run described by a `Bytes(n)` field.
    pub fn bytes(&self, desc: &FieldDescriptor) -> Result<&'a [u8], LayoutError> {
        let FieldKind::Bytes(len) = desc.kind else {
            return Err(LayoutError::KindMismatch { field: desc.id });
        };
        check(desc, FieldKind::Bytes(len), self.buffer.len())?;
        Ok(&self.buffer[desc.offset..desc.end()])
    }

    /// Read the `index`-th little-endian `u16` inside a `Bytes(n)` field.
    pub fn u16_at(&self, desc: &FieldDescriptor, index: usize) -> Result<u16, LayoutError> {
        let run = self.bytes(desc)?;
        let start = index * 2;
        if start + 2 > run.len() {
            return Err(LayoutError::OutOfBounds {
                field: desc.id,
                end: desc.offset + start + 2,
                available: desc.end(),
            });
        }
        Ok(u16::from_le_bytes([run[start], run[start + 1]]))
    }

    fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buffer[offset..offset + N]);
        out
    }
}

//==================================================================================LAYOUT_WRITER
/// Overwrites typed fields of a payload template in place. Bytes not covered
/// by a descriptor are left untouched.
pub struct LayoutWriter<'a> {
    buffer: &'a mut [u8],
}

impl<'a> LayoutWriter<'a> {
    /// Wrap the target buffer (usually a freshly copied template).
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer }
    }

    pub fn put_u8(&mut self, desc: &FieldDescriptor, value: u8) -> Result<(), LayoutError> {
        check(desc, FieldKind::U8, self.buffer.len())?;
        self.buffer[desc.offset] = value;
        Ok(())
    }

    pub fn put_u16(&mut self, desc: &FieldDescriptor, value: u16) -> Result<(), LayoutError> {
        check(desc, FieldKind::U16Le, self.buffer.len())?;
        self.write_at(desc.offset, &value.to_le_bytes());
        Ok(())
    }

    pub fn put_i16(&mut self, desc: &FieldDescriptor, value: i16) -> Result<(), LayoutError> {
        check(desc, FieldKind::I16Le, self.buffer.len())?;
        self.write_at(desc.offset, &value.to_le_bytes());
        Ok(())
    }

    pub fn put_u32(&mut self, desc: &FieldDescriptor, value: u32) -> Result<(), LayoutError> {
        check(desc, FieldKind::U32Le, self.buffer.len())?;
        self.write_at(desc.offset, &value.to_le_bytes());
        Ok(())
    }

    pub fn put_i32(&mut self, desc: &FieldDescriptor, value: i32) -> Result<(), LayoutError> {
        check(desc, FieldKind::I32Le, self.buffer.len())?;
        self.write_at(desc.offset, &value.to_le_bytes());
        Ok(())
    }

    /// Copy a byte run into a `Bytes(n)` field. `value` must be exactly `n` long.
    pub fn put_bytes(&mut self, desc: &FieldDescriptor, value: &[u8]) -> Result<(), LayoutError> {
        if desc.kind != FieldKind::Bytes(value.len()) {
            return Err(LayoutError::KindMismatch { field: desc.id });
        }
        check(desc, desc.kind, self.buffer.len())?;
        self.write_at(desc.offset, value);
        Ok(())
    }

    /// Write `values` as consecutive little-endian `u16` inside a `Bytes(n)` field.
    pub fn put_u16_array(&mut self, desc: &FieldDescriptor, values: &[u16]) -> Result<(), LayoutError> {
        if desc.kind != FieldKind::Bytes(values.len() * 2) {
            return Err(LayoutError::KindMismatch { field: desc.id });
        }
        check(desc, desc.kind, self.buffer.len())?;
        for (i, value) in values.iter().enumerate() {
            self.write_at(desc.offset + i * 2, &value.to_le_bytes());
        }
        Ok(())
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) {
        self.buffer[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
