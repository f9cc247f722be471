//! Common test utilities: a recording stand-in for a GPU backend
#![allow(dead_code)]

use binop_dispatch::array::{ArrayDesc, broadcast_shapes};
use binop_dispatch::binary::{BinaryOpType, KernelKey, KernelRequest, OutputArity, binary_output_layout};
use binop_dispatch::dtype::DType;
use binop_dispatch::error::{Error, Result};
use binop_dispatch::runtime::{
    CommandEncoder, ComputeKernel, Device, GridSize, ScalarArg, Stream, VectorArg,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

// =============================================================================
// Recorded events
// =============================================================================

/// One argument slot as bound by the dispatch core
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    Input { handle: u64, index: usize },
    Output { handle: u64, index: usize },
    Scalar { value: ScalarArg, index: usize },
    Vector { value: VectorArg, index: usize },
}

/// One registry lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup {
    pub name: String,
    pub key: KernelKey,
    pub in_dtype: DType,
    pub out_dtype: DType,
    pub arity: OutputArity,
}

/// One `dispatch_threads` call with everything bound before it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    pub kernel: String,
    pub arity: OutputArity,
    pub stream: Stream,
    pub bindings: Vec<Binding>,
    pub grid: GridSize,
    pub group: GridSize,
}

// =============================================================================
// Mock backend
// =============================================================================

#[derive(Debug)]
pub struct MockKernel {
    name: String,
    arity: OutputArity,
    max_threads: usize,
}

impl ComputeKernel for MockKernel {
    fn max_total_threads_per_threadgroup(&self) -> usize {
        self.max_threads
    }
}

/// Device whose registry knows every kernel name except the ones marked
/// missing, and whose encoders record instead of submitting.
pub struct RecordingDevice {
    max_threads: usize,
    missing: HashSet<String>,
    lookups: Mutex<Vec<Lookup>>,
    dispatches: Mutex<Vec<Dispatch>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::with_max_threads(1024)
    }

    pub fn with_max_threads(max_threads: usize) -> Self {
        Self {
            max_threads,
            missing: HashSet::new(),
            lookups: Mutex::new(Vec::new()),
            dispatches: Mutex::new(Vec::new()),
        }
    }

    pub fn without_kernel(mut self, name: &str) -> Self {
        self.missing.insert(name.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.lock().clone()
    }

    pub fn dispatches(&self) -> Vec<Dispatch> {
        self.dispatches.lock().clone()
    }

    pub fn only_dispatch(&self) -> Dispatch {
        let dispatches = self.dispatches.lock();
        assert_eq!(dispatches.len(), 1, "expected exactly one dispatch");
        dispatches[0].clone()
    }
}

impl Device for RecordingDevice {
    type Kernel = Arc<MockKernel>;
    type Encoder<'a>
        = RecordingEncoder<'a>
    where
        Self: 'a;

    fn binary_kernel(&self, request: &KernelRequest<'_>) -> Result<Arc<MockKernel>> {
        self.lookups.lock().push(Lookup {
            name: request.name.to_string(),
            key: *request.key,
            in_dtype: request.in_dtype,
            out_dtype: request.out_dtype,
            arity: request.arity,
        });
        if self.missing.contains(request.name) {
            return Err(Error::kernel_not_found(request.name, "not in kernel library"));
        }
        Ok(Arc::new(MockKernel {
            name: request.name.to_string(),
            arity: request.arity,
            max_threads: self.max_threads,
        }))
    }

    fn command_encoder(&self, stream: &Stream) -> Result<RecordingEncoder<'_>> {
        Ok(RecordingEncoder {
            device: self,
            stream: *stream,
            kernel: None,
            bindings: Vec::new(),
        })
    }
}

pub struct RecordingEncoder<'a> {
    device: &'a RecordingDevice,
    stream: Stream,
    kernel: Option<Arc<MockKernel>>,
    bindings: Vec<Binding>,
}

impl CommandEncoder for RecordingEncoder<'_> {
    type Kernel = Arc<MockKernel>;

    fn set_compute_pipeline_state(&mut self, kernel: &Arc<MockKernel>) {
        self.kernel = Some(Arc::clone(kernel));
    }

    fn set_input_array(&mut self, array: &ArrayDesc, index: usize) {
        self.bindings.push(Binding::Input {
            handle: array.handle(),
            index,
        });
    }

    fn set_output_array(&mut self, array: &ArrayDesc, index: usize) {
        self.bindings.push(Binding::Output {
            handle: array.handle(),
            index,
        });
    }

    fn set_bytes(&mut self, value: ScalarArg, index: usize) {
        self.bindings.push(Binding::Scalar { value, index });
    }

    fn set_vector_bytes(&mut self, value: &VectorArg, index: usize) {
        self.bindings.push(Binding::Vector {
            value: value.clone(),
            index,
        });
    }

    fn dispatch_threads(&mut self, grid: GridSize, group: GridSize) -> Result<()> {
        let kernel = self
            .kernel
            .take()
            .ok_or_else(|| Error::Backend("dispatch without a pipeline".into()))?;
        self.device.dispatches.lock().push(Dispatch {
            kernel: kernel.name.clone(),
            arity: kernel.arity,
            stream: self.stream,
            bindings: std::mem::take(&mut self.bindings),
            grid,
            group,
        });
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Install a test log subscriber (honours `RUST_LOG`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Allocate an output the way an array container would: broadcast shape,
/// laid out as the selected kernel family writes it.
pub fn output_for(a: &ArrayDesc, b: &ArrayDesc, dtype: DType, handle: u64) -> ArrayDesc {
    let shape = broadcast_shapes(a.shape(), b.shape()).expect("broadcastable operands");
    let a = a.layout().broadcast_to(&shape).expect("broadcast a");
    let b = b.layout().broadcast_to(&shape).expect("broadcast b");
    let op_type = BinaryOpType::classify(&a, &b);
    ArrayDesc::new(handle, dtype, binary_output_layout(op_type, &a, &b))
}
