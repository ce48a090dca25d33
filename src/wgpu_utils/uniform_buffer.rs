use std::marker::PhantomData;

/// GPU buffer holding one `T`, written through the queue
///
/// Writes of the same bytes as the previous write are dropped, so callers
/// can push their state every frame.
pub struct UniformBuffer<T> {
    buffer: wgpu::Buffer,
    last_write: LastWrite,
    _content: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device) -> Self {
        let type_name = std::any::type_name::<T>();
        let short_name = type_name.rsplit("::").next().unwrap_or(type_name);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Uniform", short_name)),
            size: std::mem::size_of::<T>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            last_write: LastWrite::default(),
            _content: PhantomData,
        }
    }

    pub fn update_content(&mut self, queue: &wgpu::Queue, content: T) {
        let bytes = bytemuck::bytes_of(&content);
        if self.last_write.replace(bytes) {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

/// Bytes of the most recent write; empty until the first one
#[derive(Debug, Default)]
struct LastWrite(Vec<u8>);

impl LastWrite {
    /// Stores `bytes` and reports whether they differ from the previous write
    fn replace(&mut self, bytes: &[u8]) -> bool {
        if !self.0.is_empty() && self.0 == bytes {
            return false;
        }
        self.0.clear();
        self.0.extend_from_slice(bytes);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_contents_are_skipped() {
        let mut last = LastWrite::default();
        assert!(last.replace(&[1, 2, 3, 4]));
        assert!(!last.replace(&[1, 2, 3, 4]));
        assert!(last.replace(&[1, 2, 3, 5]));
        assert!(!last.replace(&[1, 2, 3, 5]));
    }

    #[test]
    fn test_first_write_always_goes_through() {
        let mut last = LastWrite::default();
        assert!(last.replace(&[0; 16]));
    }
}
