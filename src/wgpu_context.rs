//! Creates the WGPU context, whose construction is async.
//!
//! Creating the surface's adapter and the device/queue pair are async in
//! WGPU. Native builds can block on them; WASM builds cannot. A
//! [`FutureWgpuContext`] starts the construction and is then polled from the
//! event loop with [`FutureWgpuContext::state`] until it settles.

use futures::channel::oneshot::{Canceled, Receiver, Sender};
use log::warn;
use pollster::block_on;
use std::{
    cell::{OnceCell, RefCell},
    fmt::Debug,
    future::Future,
};
use thiserror::Error;

/// Failures while setting up WGPU.
#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("could not create a WGPU surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no WGPU adapter is compatible with the window surface")]
    NoAdapter,
    #[error("could not create a WGPU device and queue: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("WGPU context creation was canceled")]
    Canceled,
}

/// Encapsulates parts of WGPU that need async construction.
#[derive(Debug)]
pub struct WgpuContext {
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuContext {
    /// Create a new `WgpuContext` in an async function.
    ///
    /// The adapter is requested to be compatible with the surface created for
    /// `window`; the remaining adapter options are taken from
    /// `request_adapter_options`.
    async fn new_async(
        window: impl Into<wgpu::SurfaceTarget<'static>> + 'static,
        instance_descriptor: wgpu::InstanceDescriptor,
        request_adapter_options: wgpu::RequestAdapterOptions<'static, 'static>,
        device_descriptor: wgpu::DeviceDescriptor<'static>,
    ) -> Result<Self, GraphicsError> {
        let instance = wgpu::Instance::new(instance_descriptor);
        let surface = instance.create_surface(window)?;

        let adapter_options_for_surface = wgpu::RequestAdapterOptions {
            power_preference: request_adapter_options.power_preference,
            force_fallback_adapter: request_adapter_options.force_fallback_adapter,
            compatible_surface: Some(&surface),
        };
        let adapter = instance
            .request_adapter(&adapter_options_for_surface)
            .await
            .ok_or(GraphicsError::NoAdapter)?;

        let (device, queue) = adapter.request_device(&device_descriptor, None).await?;

        Ok(WgpuContext {
            surface,
            adapter,
            device,
            queue,
        })
    }

    /// Return a reference to the WGPU Surface.
    pub fn surface(&self) -> &wgpu::Surface {
        &self.surface
    }

    /// Return a reference to the WGPU Adapter.
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Return a reference to the WGPU Device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Return a reference to the WGPU Queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

/// State of an async computation to create a [`WgpuContext`].
#[derive(Debug)]
pub enum ContextState {
    /// The [`WgpuContext`] has been created.
    Ready(WgpuContext),
    /// The async computation has not yet been completed.
    Pending,
    /// Creation failed, or was canceled.
    Failed(GraphicsError),
}

/// A possibly-ongoing async computation to create a [`WgpuContext`].
#[derive(Debug)]
pub struct FutureWgpuContext {
    value_cell: OnceCell<ContextState>,
    receiver: RefCell<Receiver<Result<WgpuContext, GraphicsError>>>,
}

impl FutureWgpuContext {
    /// Create a new `FutureWgpuContext`, which will perform async
    /// construction of a `WgpuContext`.
    ///
    /// After creating a `FutureWgpuContext`, poll it from the application
    /// event loop with [`FutureWgpuContext::state`].
    pub fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>> + 'static,
        instance_descriptor: wgpu::InstanceDescriptor,
        request_adapter_options: wgpu::RequestAdapterOptions<'static, 'static>,
        device_descriptor: wgpu::DeviceDescriptor<'static>,
    ) -> Self {
        FutureWgpuContext {
            value_cell: OnceCell::new(),
            receiver: RefCell::new(spawn_receiver(|| {
                WgpuContext::new_async(
                    window,
                    instance_descriptor,
                    request_adapter_options,
                    device_descriptor,
                )
            })),
        }
    }

    /// Returns the context once it is ready.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(context))`: the context is ready.
    /// - `Ok(None)`: creation is still pending.
    /// - `Err(error)`: creation failed.
    pub fn ready(&self) -> Result<Option<&WgpuContext>, &GraphicsError> {
        match self.state() {
            ContextState::Ready(context) => Ok(Some(context)),
            ContextState::Pending => Ok(None),
            ContextState::Failed(error) => Err(error),
        }
    }

    /// Polls the creation and returns its current state.
    pub fn state(&self) -> &ContextState {
        if let Some(value) = self.value_cell.get() {
            return value;
        }
        let mut receiver = self.receiver.borrow_mut();
        let settled = match receiver.try_recv() {
            Ok(Some(Ok(context))) => ContextState::Ready(context),
            Ok(Some(Err(error))) => ContextState::Failed(error),
            Ok(None) => return &ContextState::Pending,
            Err(Canceled) => ContextState::Failed(GraphicsError::Canceled),
        };
        receiver.close();
        self.value_cell.get_or_init(|| settled)
    }
}

/// Run async function `f`, possibly blocking on it, and return a `Receiver`
/// for its returned value.
///
/// WASM cannot block, so the function is spawned there and its result
/// arrives on the channel later. Native platforms block until it is done.
fn spawn_receiver<Fn, Fut, T>(f: Fn) -> Receiver<T>
where
    T: Debug + 'static,
    Fn: FnOnce() -> Fut + 'static,
    Fut: Future<Output = T> + 'static,
{
    let (sender, receiver) = futures::channel::oneshot::channel::<T>();
    spawn(sender, f);
    receiver
}

/// Run async function `f`, possibly blocking on it, and send the resulting
/// value to `sender`.
fn spawn<Fn, Fut, T>(sender: Sender<T>, f: Fn)
where
    T: Debug + 'static,
    Fn: FnOnce() -> Fut + 'static,
    Fut: Future<Output = T> + 'static,
{
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            let result = f().await;
            if sender.send(result).is_err() {
                warn!("WGPU context was created after its receiver was dropped.");
            }
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let result = block_on(f());
        if sender.send(result).is_err() {
            warn!("WGPU context was created after its receiver was dropped.");
        }
    }
}
